//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup and is immutable for the lifetime of the process.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | Token signing secret (base64, hex, or raw UTF-8) | Required |
//! | `JWT_TTL_MS` | Default token time-to-live in milliseconds | `3600000` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `BLACKLIST_BACKEND` | Revocation store backend (`memory` or `redis`) | `memory` |
//! | `REDIS_URL` | Redis connection URL (redis backend only) | Required for redis |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::env;

/// Environment variable name for the token signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable name for the default token TTL in milliseconds.
pub const JWT_TTL_ENV: &str = "JWT_TTL_MS";

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the revocation store backend.
pub const BLACKLIST_BACKEND_ENV: &str = "BLACKLIST_BACKEND";

/// Environment variable name for the redis connection URL.
pub const REDIS_URL_ENV: &str = "REDIS_URL";

/// Environment variable name for the logging format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default token time-to-live: one hour.
pub const DEFAULT_TOKEN_TTL_MS: i64 = 3_600_000;

/// Configuration errors. All of these are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("token signing secret is not set (set {JWT_SECRET_ENV})")]
    MissingSecret,

    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("unknown revocation store backend '{0}' (expected 'memory' or 'redis')")]
    UnknownBackend(String),

    #[error("revocation store backend 'redis' requires the 'redis-blacklist' feature")]
    BackendUnavailable,

    #[error("redis backend selected but {REDIS_URL_ENV} is not set")]
    MissingRedisUrl,

    #[cfg(feature = "redis-blacklist")]
    #[error("failed to open redis client: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Which revocation store implementation to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlacklistBackend {
    /// In-process concurrent map (single-instance deployments).
    InMemory,
    /// External cache service (multi-instance deployments).
    Redis { url: String },
}

/// Immutable runtime configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_ms: i64,
    pub blacklist: BlacklistBackend,
}

impl Config {
    /// Load configuration from the environment, failing fast on anything
    /// that would leave the service unable to sign or validate tokens.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var(JWT_SECRET_ENV).unwrap_or_default();
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        let token_ttl_ms = match env::var(JWT_TTL_ENV) {
            Ok(raw) => raw.parse::<i64>().ok().filter(|ms| *ms > 0).ok_or(
                ConfigError::InvalidValue {
                    var: JWT_TTL_ENV,
                    value: raw,
                },
            )?,
            Err(_) => DEFAULT_TOKEN_TTL_MS,
        };

        let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var(PORT_ENV) {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue {
                    var: PORT_ENV,
                    value: raw,
                })?,
            Err(_) => 8080,
        };

        let blacklist = match env::var(BLACKLIST_BACKEND_ENV).as_deref() {
            Err(_) | Ok("memory") => BlacklistBackend::InMemory,
            Ok("redis") => {
                if !cfg!(feature = "redis-blacklist") {
                    return Err(ConfigError::BackendUnavailable);
                }
                let url = env::var(REDIS_URL_ENV).map_err(|_| ConfigError::MissingRedisUrl)?;
                BlacklistBackend::Redis { url }
            }
            Ok(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_ttl_ms,
            blacklist,
        })
    }
}
