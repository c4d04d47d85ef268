//! Account operations: signup, credential verification, identity resolution.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ApiError;
use crate::models::RegisterRequest;

use super::password::{hash_password, verify_password};
use super::repository::{NewUser, UserRepository};
use super::user::{User, DEFAULT_ROLE};

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("Username is already in use: {0}")]
    UsernameTaken(String),

    #[error("Email is already in use: {0}")]
    EmailTaken(String),

    #[error("User not found")]
    NotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hashing failed")]
    Hash(#[from] bcrypt::BcryptError),
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match &err {
            IdentityError::Validation(_) => ApiError::bad_request(err.to_string()),
            IdentityError::UsernameTaken(_) | IdentityError::EmailTaken(_) => {
                ApiError::conflict(err.to_string())
            }
            IdentityError::NotFound => ApiError::not_found(err.to_string()),
            IdentityError::InvalidCredentials => ApiError::unauthorized(err.to_string()),
            IdentityError::Hash(_) => ApiError::internal(),
        }
    }
}

/// Enforces account invariants over an abstract user store.
pub struct IdentityService {
    repository: Arc<dyn UserRepository>,
}

impl IdentityService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Create an account. Username and email must each be globally unique;
    /// the password is stored only as a bcrypt hash and the role is fixed to
    /// `"user"`.
    pub async fn signup(&self, request: RegisterRequest) -> Result<User, IdentityError> {
        info!(username = %request.username, "Signup requested");

        if request.username.trim().is_empty() {
            return Err(IdentityError::Validation("Username is empty"));
        }
        if request.email.trim().is_empty() {
            return Err(IdentityError::Validation("Email is empty"));
        }

        if self.repository.find_by_email(&request.email).await.is_some() {
            warn!(email = %request.email, "Attempt to register with an existing email");
            return Err(IdentityError::EmailTaken(request.email));
        }

        if request.password.trim().is_empty() {
            return Err(IdentityError::Validation("Password is empty"));
        }

        // One combined lookup covers both uniqueness checks.
        if let Some(existing) = self
            .repository
            .find_conflicting(&request.username, &request.email)
            .await
        {
            if existing.username == request.username {
                warn!(username = %request.username, "Username already exists");
                return Err(IdentityError::UsernameTaken(request.username));
            }
            warn!(email = %request.email, "Email already exists");
            return Err(IdentityError::EmailTaken(request.email));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .repository
            .insert(NewUser {
                username: request.username,
                email: request.email,
                password_hash,
                role: DEFAULT_ROLE.to_string(),
            })
            .await;

        info!(username = %user.username, id = user.id, "User registered");
        Ok(user)
    }

    /// Verify credentials for a username or email identifier.
    pub async fn authenticate(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<User, IdentityError> {
        info!(identifier = %identifier, "Login requested");

        if identifier.trim().is_empty() {
            return Err(IdentityError::Validation("Username is empty"));
        }
        if password.trim().is_empty() {
            return Err(IdentityError::Validation("Password is empty"));
        }

        // Identifiers containing '@' are emails; everything else is a
        // username.
        let user = if identifier.contains('@') {
            self.repository.find_by_email(identifier).await
        } else {
            self.repository.find_by_username(identifier).await
        };

        let Some(user) = user else {
            warn!(identifier = %identifier, "No identity for login identifier");
            return Err(IdentityError::NotFound);
        };

        if !verify_password(password, &user.password_hash) {
            warn!(identifier = %identifier, "Invalid credentials");
            return Err(IdentityError::InvalidCredentials);
        }

        info!(username = %user.username, "Authenticated");
        Ok(user)
    }

    /// Resolve an identity by username or email.
    pub async fn resolve(&self, identifier: &str) -> Result<User, IdentityError> {
        if identifier.trim().is_empty() {
            return Err(IdentityError::Validation("UsernameOrEmail is empty"));
        }

        match self.repository.find_by_identifier(identifier).await {
            Some(user) => Ok(user),
            None => {
                warn!(identifier = %identifier, "Username or email not found");
                Err(IdentityError::NotFound)
            }
        }
    }
}
