//! Per-request authentication pipeline.
//!
//! A single ordered pass over every inbound request:
//!
//! 1. **Extract** the `Authorization: Bearer` token; absence means the
//!    request continues anonymously.
//! 2. **Revocation check** before any signature work: a revoked token is
//!    rejected immediately, however valid its signature still is.
//! 3. **Validate and bind**: a structurally valid, unexpired token resolves
//!    to an identity bound into request extensions, unless one is already
//!    bound.
//! 4. Every failure past the revocation check is logged and swallowed; the
//!    request proceeds unauthenticated and the 401 decision is left to the
//!    `Auth` extractor downstream.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::state::AppState;

use super::error::AuthError;
use super::extractor::CurrentUser;

/// Pull the bearer token out of the `Authorization` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authentication middleware applied to the whole router.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()).map(str::to_owned) else {
        return next.run(request).await;
    };

    if state.blacklist.is_revoked(&token).await {
        debug!("Request with revoked token rejected");
        return AuthError::TokenRevoked.into_response();
    }

    if state.tokens.validate(&token) {
        match state.tokens.extract_subject(&token) {
            Ok(subject) => {
                if request.extensions().get::<CurrentUser>().is_none() {
                    match state.identities.resolve(&subject).await {
                        Ok(user) => {
                            request.extensions_mut().insert(CurrentUser::from(&user));
                        }
                        Err(e) => {
                            debug!(subject = %subject, error = %e, "Token subject did not resolve to an identity");
                        }
                    }
                }
            }
            Err(e) => {
                debug!(error = %e, "Token subject extraction failed");
            }
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let headers = headers_with("Bearer   abc  ");
        assert_eq!(bearer_token(&headers), Some("abc"));
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&headers_with("bearer abc")), None);
    }
}
