//! Token revocation store.
//!
//! Revoked tokens are tracked until their natural expiry so a logout takes
//! effect immediately even though the token itself remains cryptographically
//! valid. Entries are keyed by the raw token string and carry the expiry
//! copied from the token's own claim at revocation time.
//!
//! Two implementations exist behind [`TokenBlacklist`]:
//!
//! - [`InMemoryBlacklist`] (default): a concurrent map for single-instance
//!   deployments. Lookups happen on the hot request path; a background
//!   [`BlacklistSweeper`] drops expired entries every five minutes, and
//!   lookups purge lazily in between.
//! - `RedisBlacklist` (feature `redis-blacklist`): an external cache for
//!   multi-instance deployments. Entries are stored with a server-side TTL,
//!   so the sweep has nothing to do there.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::token::now_ms;

/// Window applied when a token's real expiry is unknown or already past.
/// Keeps just-expired tokens occupying the store briefly, guarding against
/// re-presentation under clock skew.
pub const FALLBACK_TTL_MS: i64 = 3_600_000;

/// Interval between background sweeps.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// A concurrent store of revoked tokens with per-entry expiry.
///
/// Lookups never error: a backend failure logs server-side and reads as
/// "not revoked".
#[async_trait]
pub trait TokenBlacklist: Send + Sync {
    /// Record `token` as revoked until `expires_at_ms` (epoch milliseconds).
    /// Blank tokens are ignored. An already-past expiry is replaced by the
    /// fallback window; a still-live entry is never extended.
    async fn revoke(&self, token: &str, expires_at_ms: i64);

    /// Whether `token` is currently revoked. Blank tokens are never revoked.
    async fn is_revoked(&self, token: &str) -> bool;

    /// Drop entries whose expiry has passed; returns how many were removed.
    /// Idempotent and safe to run concurrently with `revoke`/`is_revoked`.
    async fn sweep(&self) -> usize;
}

/// In-process revocation store backed by a concurrent map.
#[derive(Default)]
pub struct InMemoryBlacklist {
    entries: DashMap<String, i64>,
}

impl InMemoryBlacklist {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenBlacklist for InMemoryBlacklist {
    async fn revoke(&self, token: &str, expires_at_ms: i64) {
        if token.trim().is_empty() {
            return;
        }

        let now = now_ms();
        let stored = if expires_at_ms > now {
            expires_at_ms
        } else {
            now + FALLBACK_TTL_MS
        };

        match self.entries.entry(token.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(stored);
            }
            Entry::Occupied(mut existing) => {
                // A live entry keeps its original expiry; only an expired
                // leftover is re-armed.
                if *existing.get() <= now {
                    existing.insert(stored);
                }
            }
        }
    }

    async fn is_revoked(&self, token: &str) -> bool {
        if token.trim().is_empty() {
            return false;
        }

        let expires_at = match self.entries.get(token) {
            Some(entry) => *entry.value(),
            None => return false,
        };

        if expires_at > now_ms() {
            true
        } else {
            // Lazy expiry between sweeps.
            self.entries.remove_if(token, |_, expiry| *expiry <= now_ms());
            false
        }
    }

    async fn sweep(&self) -> usize {
        let now = now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, expiry| *expiry > now);
        before.saturating_sub(self.entries.len())
    }
}

/// Periodic sweep of the revocation store, independent of request traffic.
pub struct BlacklistSweeper {
    blacklist: Arc<dyn TokenBlacklist>,
    interval: Duration,
}

impl BlacklistSweeper {
    pub fn new(blacklist: Arc<dyn TokenBlacklist>) -> Self {
        Self {
            blacklist,
            interval: SWEEP_INTERVAL,
        }
    }

    #[cfg(test)]
    fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run the sweep loop until the cancellation token is triggered.
    ///
    /// Spawn as a background task:
    /// ```rust,ignore
    /// tokio::spawn(sweeper.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Revocation sweeper starting"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.cancelled() => {
                    info!("Revocation sweeper shutting down");
                    return;
                }
            }

            let removed = self.blacklist.sweep().await;
            if removed > 0 {
                debug!(removed, "Revocation sweep dropped expired entries");
            }
        }
    }
}

#[cfg(feature = "redis-blacklist")]
pub use self::redis_backend::RedisBlacklist;

#[cfg(feature = "redis-blacklist")]
mod redis_backend {
    use redis::AsyncCommands;
    use tracing::warn;

    use crate::config::ConfigError;

    use super::*;

    /// External-cache revocation store. The cache expires entries itself
    /// (`SET ... PX`), so revocations are visible to every instance sharing
    /// the cache and the sweep is a no-op.
    pub struct RedisBlacklist {
        client: redis::Client,
    }

    impl RedisBlacklist {
        pub fn new(url: &str) -> Result<Self, ConfigError> {
            let client = redis::Client::open(url)?;
            Ok(Self { client })
        }
    }

    #[async_trait]
    impl TokenBlacklist for RedisBlacklist {
        async fn revoke(&self, token: &str, expires_at_ms: i64) {
            if token.trim().is_empty() {
                return;
            }

            let remaining = expires_at_ms - now_ms();
            let ttl_ms = if remaining > 0 {
                remaining
            } else {
                FALLBACK_TTL_MS
            };

            let mut conn = match self.client.get_multiplexed_async_connection().await {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "Revocation store unreachable; revoke dropped");
                    return;
                }
            };

            let result: redis::RedisResult<()> = redis::cmd("SET")
                .arg(token)
                .arg("revoked")
                .arg("NX")
                .arg("PX")
                .arg(ttl_ms)
                .query_async(&mut conn)
                .await;

            if let Err(e) = result {
                warn!(error = %e, "Failed to record token revocation");
            }
        }

        async fn is_revoked(&self, token: &str) -> bool {
            if token.trim().is_empty() {
                return false;
            }

            let mut conn = match self.client.get_multiplexed_async_connection().await {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "Revocation store unreachable; treating token as not revoked");
                    return false;
                }
            };

            match conn.exists::<_, bool>(token).await {
                Ok(found) => found,
                Err(e) => {
                    warn!(error = %e, "Revocation lookup failed; treating token as not revoked");
                    false
                }
            }
        }

        async fn sweep(&self) -> usize {
            // Entries carry a server-side TTL; the cache expires them.
            0
        }
    }
}
