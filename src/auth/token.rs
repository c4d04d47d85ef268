//! Token issuance and validation.
//!
//! Tokens are self-contained HS256-signed credentials carrying three claims:
//! subject (username), issued-at, and expiry. Nothing is persisted; every
//! validation reconstructs the claims from the signature.
//!
//! Wire claims use epoch seconds (JWT NumericDate). All comparisons and the
//! expiry values handed to the revocation store use epoch milliseconds, and
//! the expiry check is strict: a token is live only while `exp > now`.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

use super::keys::decode_secret;

/// Errors surfaced by claim extraction. Validation itself never errors; it
/// reports any failure as "invalid".
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed or its signature is invalid")]
    Malformed,

    #[error("token does not contain an expiry claim")]
    MissingExpiry,

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Signed claim set. `exp` is optional on the way in so a missing expiry is
/// detectable rather than a parse failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the account username.
    pub sub: String,
    /// Issued-at, epoch seconds.
    #[serde(default)]
    pub iat: i64,
    /// Expiry, epoch seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Issues and validates signed bearer tokens with a process-wide symmetric
/// key, decoded once at startup and never rotated at runtime.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    default_ttl_ms: i64,
}

impl TokenService {
    /// Build a service from configured secret material and a default TTL.
    pub fn new(secret: &str, default_ttl_ms: i64) -> Result<Self, ConfigError> {
        let key_bytes = decode_secret(secret)?;
        Ok(Self {
            encoding_key: EncodingKey::from_secret(&key_bytes),
            decoding_key: DecodingKey::from_secret(&key_bytes),
            default_ttl_ms,
        })
    }

    /// Issue a token for `subject` with the default TTL.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_with_ttl(subject, self.default_ttl_ms)
    }

    /// Issue a token for `subject` expiring `ttl_ms` from now.
    pub fn issue_with_ttl(&self, subject: &str, ttl_ms: i64) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: Some((now + chrono::Duration::milliseconds(ttl_ms)).timestamp()),
        };
        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Whether the token's signature verifies and its expiry is still in the
    /// future. Malformed input, a bad signature, or a missing expiry claim
    /// all yield `false`; this never errors to the caller.
    pub fn validate(&self, token: &str) -> bool {
        match self.extract_claims(token) {
            Ok(claims) => match claims.exp {
                Some(exp) => exp * 1000 > now_ms(),
                None => false,
            },
            Err(_) => false,
        }
    }

    /// Verify the signature and return the subject claim.
    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        Ok(self.extract_claims(token)?.sub)
    }

    /// Verify the signature and return the expiry claim in epoch
    /// milliseconds.
    pub fn extract_expiry(&self, token: &str) -> Result<i64, TokenError> {
        self.extract_claims(token)?
            .exp
            .map(|exp| exp * 1000)
            .ok_or(TokenError::MissingExpiry)
    }

    /// Decode the claim set, verifying the signature only. Expiry is checked
    /// by the callers with strict millisecond semantics, so the library's
    /// leeway-based expiry validation stays disabled.
    fn extract_claims(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Malformed)
    }
}

/// Current time in epoch milliseconds.
pub(crate) fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
