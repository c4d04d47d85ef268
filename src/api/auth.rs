//! Signup, login, and logout endpoints.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{info, warn};

use crate::{
    auth::{middleware::bearer_token, token::now_ms, FALLBACK_TTL_MS},
    error::ApiError,
    models::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Account created", body = MessageResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 409, description = "Username or email already registered"),
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.identities.signup(request).await?;
    Ok(Json(MessageResponse::new("Register successfully")))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Credential issued", body = LoginResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "No such account"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .identities
        .authenticate(&request.username, &request.password)
        .await?;

    let token = state.tokens.issue(&user.username).map_err(|e| {
        warn!(error = %e, "Token issuance failed");
        ApiError::internal()
    })?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token: format!("Bearer {token}"),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Token revoked (or already revoked)", body = MessageResponse),
        (status = 400, description = "No bearer token in the request", body = MessageResponse),
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (StatusCode, Json<MessageResponse>) {
    info!("Logout request received");

    let Some(token) = bearer_token(&headers) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse::new("No Authorization Bearer token provided")),
        );
    };

    if state.blacklist.is_revoked(token).await {
        warn!("Token already revoked");
        return (
            StatusCode::OK,
            Json(MessageResponse::new("Token already invalidated")),
        );
    }

    match state.tokens.extract_expiry(token) {
        Ok(expires_at) => {
            state.blacklist.revoke(token, expires_at).await;
            info!(expires_at, "Token revoked");
            (
                StatusCode::OK,
                Json(MessageResponse::new("Logout successful")),
            )
        }
        Err(e) => {
            // Logout is best-effort: an unreadable expiry still revokes the
            // token for the fallback window.
            warn!(error = %e, "Could not read token expiry; applying fallback TTL");
            state
                .blacklist
                .revoke(token, now_ms() + FALLBACK_TTL_MS)
                .await;
            (
                StatusCode::OK,
                Json(MessageResponse::new("Logout processed (fallback TTL)")),
            )
        }
    }
}
