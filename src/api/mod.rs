use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::middleware::authenticate,
    models::{
        LoginRequest, LoginResponse, MessageResponse, RegisterRequest, RoleResponse,
        UserInfoResponse,
    },
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    // Logout is added after the authentication layer so it handles revoked
    // tokens itself ("Token already invalidated") instead of being cut off
    // by the pipeline's revocation check.
    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/me", get(users::me))
        .route("/info", get(users::info))
        .layer(from_fn_with_state(state.clone(), authenticate))
        .route("/logout", post(auth::logout))
        .with_state(state);

    Router::new()
        .nest("/api/v1/auth", auth_routes)
        .route("/health", get(health::health))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup,
        auth::login,
        auth::logout,
        users::me,
        users::info,
        health::health
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            MessageResponse,
            LoginResponse,
            RoleResponse,
            UserInfoResponse,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Account creation, credential issuance, and revocation"),
        (name = "Health", description = "Liveness probes")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header::AUTHORIZATION, header::CONTENT_TYPE, Request, StatusCode};
    use tower::ServiceExt;

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_token(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, token);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::for_tests());
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn health_is_reachable_anonymously() {
        let app = router(AppState::for_tests());
        let response = app
            .oneshot(get_with_token("/health", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_route_without_token_is_unauthorized() {
        let app = router(AppState::for_tests());
        let response = app
            .oneshot(get_with_token("/api/v1/auth/me", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "unauthorized");
        assert_eq!(
            body["message"],
            "Unauthorized access: Authentication required"
        );
    }

    #[tokio::test]
    async fn signup_conflicts_surface_as_409() {
        let app = router(AppState::for_tests());

        let first = app
            .clone()
            .oneshot(json_post(
                "/api/v1/auth/signup",
                serde_json::json!({
                    "username": "alice",
                    "email": "a@x.com",
                    "password": "secret1"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let duplicate_email = app
            .clone()
            .oneshot(json_post(
                "/api/v1/auth/signup",
                serde_json::json!({
                    "username": "alice2",
                    "email": "a@x.com",
                    "password": "secret1"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(duplicate_email.status(), StatusCode::CONFLICT);

        let duplicate_username = app
            .oneshot(json_post(
                "/api/v1/auth/signup",
                serde_json::json!({
                    "username": "alice",
                    "email": "b@x.com",
                    "password": "secret1"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(duplicate_username.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn full_credential_lifecycle() {
        let app = router(AppState::for_tests());

        // Signup.
        let response = app
            .clone()
            .oneshot(json_post(
                "/api/v1/auth/signup",
                serde_json::json!({
                    "username": "alice",
                    "email": "a@x.com",
                    "password": "secret1"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Register successfully");

        // Login, by email.
        let response = app
            .clone()
            .oneshot(json_post(
                "/api/v1/auth/login",
                serde_json::json!({
                    "username": "a@x.com",
                    "password": "secret1"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Login successful");
        let header_value = body["token"].as_str().unwrap().to_string();
        assert!(header_value.starts_with("Bearer "));

        // Authenticated request succeeds.
        let response = app
            .clone()
            .oneshot(get_with_token("/api/v1/auth/me", Some(&header_value)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["role"], "user");

        let response = app
            .clone()
            .oneshot(get_with_token("/api/v1/auth/info", Some(&header_value)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["username"], "alice");
        assert_eq!(body["id"], 1);

        // Logout revokes the token.
        let mut logout_request = json_post("/api/v1/auth/logout", serde_json::json!({}));
        logout_request
            .headers_mut()
            .insert(AUTHORIZATION, header_value.parse().unwrap());
        let response = app.clone().oneshot(logout_request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Logout successful");

        // The same token is now rejected even though its expiry has not
        // passed.
        let response = app
            .clone()
            .oneshot(get_with_token("/api/v1/auth/me", Some(&header_value)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "unauthorized");
        assert_eq!(body["message"], "Unauthorized access: Token invalidated");

        // A repeated logout reports the earlier invalidation.
        let mut repeat_logout = json_post("/api/v1/auth/logout", serde_json::json!({}));
        repeat_logout
            .headers_mut()
            .insert(AUTHORIZATION, header_value.parse().unwrap());
        let response = app.oneshot(repeat_logout).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["message"],
            "Token already invalidated"
        );
    }
}
