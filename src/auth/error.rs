//! Authentication errors and the unauthorized response shape.
//!
//! Clients receive a fixed-shape body with a truncated reason; the full
//! detail goes to the server log only, with newline and tab runs stripped so
//! a hostile token cannot forge log lines.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

/// Longest reason echoed back to a client before truncation.
const CLIENT_MESSAGE_LIMIT: usize = 100;

/// Reason used when an authorization failure carries no message.
const GENERIC_REASON: &str = "Restricted access";

/// Authorization failures surfaced to clients as 401 responses.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authenticated identity is bound to the request.
    #[error("Authentication required")]
    MissingCredentials,

    /// The presented token has been explicitly revoked.
    #[error("Token invalidated")]
    TokenRevoked,
}

#[derive(Serialize)]
struct UnauthorizedBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        unauthorized_response(Some(&self.to_string()))
    }
}

/// Build the fixed-shape 401 response for an authorization failure.
pub fn unauthorized_response(reason: Option<&str>) -> Response {
    warn!(reason = %sanitize_for_log(reason), "Unauthorized request");

    let body = Json(UnauthorizedBody {
        error: "unauthorized",
        message: format!("Unauthorized access: {}", sanitize_for_client(reason)),
    });
    (StatusCode::UNAUTHORIZED, body).into_response()
}

/// Truncate a reason for the client; internal detail never leaves the server.
fn sanitize_for_client(reason: Option<&str>) -> String {
    match reason {
        None => GENERIC_REASON.to_string(),
        Some(s) if s.chars().count() > CLIENT_MESSAGE_LIMIT => {
            let truncated: String = s.chars().take(CLIENT_MESSAGE_LIMIT).collect();
            format!("{truncated}...")
        }
        Some(s) => s.to_string(),
    }
}

/// Collapse newline/tab runs so attacker-controlled text cannot break log
/// line structure.
fn sanitize_for_log(reason: Option<&str>) -> String {
    let Some(reason) = reason else {
        return "N/A".to_string();
    };

    let mut out = String::with_capacity(reason.len());
    let mut in_run = false;
    for c in reason.chars() {
        if matches!(c, '\r' | '\n' | '\t') {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}
