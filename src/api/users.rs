//! Endpoints exposing the authenticated account.

use axum::{extract::State, Json};
use tracing::info;

use crate::{
    auth::Auth,
    error::ApiError,
    models::{RoleResponse, UserInfoResponse},
    state::AppState,
};

/// Return the authenticated account's role.
///
/// The identity is re-resolved rather than trusted from the bound context,
/// so a role change takes effect without waiting for token expiry.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Role of the authenticated account", body = RoleResponse),
        (status = 401, description = "Missing, invalid, or revoked token"),
        (status = 404, description = "Bound subject no longer resolves"),
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Auth(current): Auth,
) -> Result<Json<RoleResponse>, ApiError> {
    info!(username = %current.username, "Me request received");
    let user = state.identities.resolve(&current.username).await?;
    Ok(Json(RoleResponse { role: user.role }))
}

/// Return the authenticated account's id and username.
#[utoipa::path(
    get,
    path = "/api/v1/auth/info",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Account id and username", body = UserInfoResponse),
        (status = 401, description = "Missing, invalid, or revoked token"),
    )
)]
pub async fn info(
    State(state): State<AppState>,
    Auth(current): Auth,
) -> Result<Json<UserInfoResponse>, ApiError> {
    info!(username = %current.username, "Info request received");
    let user = state.identities.resolve(&current.username).await?;
    Ok(Json(UserInfoResponse {
        id: user.id,
        username: user.username,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CurrentUser;
    use crate::models::RegisterRequest;
    use axum::http::StatusCode;

    async fn state_with_alice() -> (AppState, CurrentUser) {
        let state = AppState::for_tests();
        let user = state
            .identities
            .signup(RegisterRequest {
                username: "alice".to_string(),
                email: "a@x.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();
        let current = CurrentUser::from(&user);
        (state, current)
    }

    #[tokio::test]
    async fn me_returns_the_stored_role() {
        let (state, current) = state_with_alice().await;
        let Json(response) = me(State(state), Auth(current)).await.unwrap();
        assert_eq!(response.role, "user");
    }

    #[tokio::test]
    async fn info_returns_id_and_username() {
        let (state, current) = state_with_alice().await;
        let Json(response) = info(State(state), Auth(current)).await.unwrap();
        assert_eq!(response.id, 1);
        assert_eq!(response.username, "alice");
    }

    #[tokio::test]
    async fn stale_subject_is_not_found() {
        let state = AppState::for_tests();
        let ghost = CurrentUser {
            id: 42,
            username: "ghost".to_string(),
            role: "user".to_string(),
        };

        let err = me(State(state), Auth(ghost)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
