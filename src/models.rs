//! # API Data Models
//!
//! Request and response data structures used by the REST API. All types
//! derive `Serialize`/`Deserialize` and `ToSchema` for automatic JSON
//! handling and OpenAPI documentation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Desired username (globally unique).
    pub username: String,
    /// Account email address (globally unique).
    pub email: String,
    /// Plaintext password; stored only as a one-way hash.
    pub password: String,
}

/// Request to authenticate with existing credentials.
///
/// The `username` field accepts either a username or an email address;
/// identifiers containing `@` are resolved by email.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username or email address.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Generic single-message response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Successful login response carrying the issued credential.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    /// Issued token, prefixed with the `Bearer ` scheme so clients can echo
    /// it back verbatim in the `Authorization` header.
    pub token: String,
}

/// Response for GET /api/v1/auth/me.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoleResponse {
    /// The authenticated account's role label.
    pub role: String,
}

/// Response for GET /api/v1/auth/info.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserInfoResponse {
    /// The account's unique numeric id.
    pub id: i64,
    /// The account's username.
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_serializes_expected_shape() {
        let response = LoginResponse {
            message: "Login successful".into(),
            token: "Bearer abc".into(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "Login successful");
        assert_eq!(json["token"], "Bearer abc");
    }

    #[test]
    fn message_response_constructor() {
        let response = MessageResponse::new("hi");
        assert_eq!(response.message, "hi");
    }
}
