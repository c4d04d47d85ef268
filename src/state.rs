use std::sync::Arc;

use crate::auth::{InMemoryBlacklist, TokenBlacklist, TokenService};
use crate::config::{BlacklistBackend, Config, ConfigError};
use crate::identity::{IdentityService, InMemoryUserRepository};

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub blacklist: Arc<dyn TokenBlacklist>,
    pub identities: Arc<IdentityService>,
}

impl AppState {
    pub fn new(
        tokens: TokenService,
        blacklist: Arc<dyn TokenBlacklist>,
        identities: IdentityService,
    ) -> Self {
        Self {
            tokens: Arc::new(tokens),
            blacklist,
            identities: Arc::new(identities),
        }
    }

    /// Assemble application state from configuration, selecting the
    /// revocation store backend.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let tokens = TokenService::new(&config.jwt_secret, config.token_ttl_ms)?;

        let blacklist: Arc<dyn TokenBlacklist> = match &config.blacklist {
            BlacklistBackend::InMemory => Arc::new(InMemoryBlacklist::new()),
            #[cfg(feature = "redis-blacklist")]
            BlacklistBackend::Redis { url } => Arc::new(crate::auth::RedisBlacklist::new(url)?),
            #[cfg(not(feature = "redis-blacklist"))]
            BlacklistBackend::Redis { .. } => return Err(ConfigError::BackendUnavailable),
        };

        let identities = IdentityService::new(Arc::new(InMemoryUserRepository::new()));

        Ok(Self::new(tokens, blacklist, identities))
    }
}

#[cfg(test)]
impl AppState {
    /// State wired entirely in-memory for tests.
    pub fn for_tests() -> Self {
        let tokens = TokenService::new("0123456789abcdef0123456789abcdef", 3_600_000)
            .expect("test secret decodes");
        Self::new(
            tokens,
            Arc::new(InMemoryBlacklist::new()),
            IdentityService::new(Arc::new(InMemoryUserRepository::new())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_builds_in_memory_state() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            token_ttl_ms: 3_600_000,
            blacklist: BlacklistBackend::InMemory,
        };
        assert!(AppState::from_config(&config).is_ok());
    }

    #[cfg(not(feature = "redis-blacklist"))]
    #[test]
    fn redis_backend_requires_the_feature() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            jwt_secret: "secret".to_string(),
            token_ttl_ms: 3_600_000,
            blacklist: BlacklistBackend::Redis {
                url: "redis://localhost:6379".to_string(),
            },
        };
        assert!(matches!(
            AppState::from_config(&config),
            Err(ConfigError::BackendUnavailable)
        ));
    }
}
