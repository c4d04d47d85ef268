//! # Authentication Module
//!
//! Signed bearer-token issuance, validation, and revocation, plus the
//! per-request pipeline that turns an `Authorization` header into a bound
//! identity.
//!
//! ## Request Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. The [`middleware::authenticate`] layer:
//!    - checks the revocation store first (a revoked token is rejected even
//!      while its signature is still valid)
//!    - verifies the HS256 signature and the strict expiry rule
//!    - resolves the subject and binds a [`CurrentUser`] to the request
//! 3. Handlers requiring authentication use the [`Auth`] extractor; its
//!    rejection produces the sanitized unauthorized response
//!
//! ## Security
//!
//! - Signing-key material is decoded once at startup and never rotated
//! - Expiry comparison is strict and millisecond-resolution
//! - Revocation entries never outlive the token's natural expiry by more
//!   than the fallback window

pub mod blacklist;
pub mod error;
pub mod extractor;
pub mod keys;
pub mod middleware;
pub mod token;

pub use blacklist::{BlacklistSweeper, InMemoryBlacklist, TokenBlacklist, FALLBACK_TTL_MS};
pub use error::AuthError;
pub use extractor::{Auth, CurrentUser};
pub use token::{TokenError, TokenService};

#[cfg(feature = "redis-blacklist")]
pub use blacklist::RedisBlacklist;
