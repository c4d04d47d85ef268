//! Axum extractor for the authenticated identity.
//!
//! The authentication middleware binds a [`CurrentUser`] into request
//! extensions when a valid, unrevoked token is presented. Handlers that
//! require authentication take the [`Auth`] extractor; its rejection is the
//! deferred 401 decision, rendered by the unauthorized responder.
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is CurrentUser
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::identity::User;

use super::error::AuthError;

/// Identity bound to the request by the authentication pipeline.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
        }
    }
}

/// Extractor requiring an authenticated identity.
pub struct Auth(pub CurrentUser);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::MissingCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn empty_parts() -> Parts {
        Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn rejects_when_no_identity_is_bound() {
        let mut parts = empty_parts();
        let result = Auth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[tokio::test]
    async fn yields_the_bound_identity() {
        let mut parts = empty_parts();
        parts.extensions.insert(CurrentUser {
            id: 7,
            username: "alice".to_string(),
            role: "user".to_string(),
        });

        let Auth(user) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.username, "alice");
    }
}
