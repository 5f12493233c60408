//! Cache tuning knobs.

use std::time::Duration;

/// Configuration for a cache instance.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_capacity: u64,

    /// Time-to-live. `None` means entries never expire on age.
    pub ttl: Option<Duration>,

    /// Time-to-idle. Entries are evicted if not accessed within this.
    pub tti: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(300)),
            tti: None,
        }
    }
}

impl CacheConfig {
    /// Config with the given capacity and the default TTL.
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            max_capacity,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = Some(duration);
        self
    }

    #[must_use]
    pub fn tti(mut self, duration: Duration) -> Self {
        self.tti = Some(duration);
        self
    }

    /// Disable age-based expiry entirely.
    ///
    /// Used for derived data whose freshness is guaranteed by explicit
    /// writer invalidation rather than time, such as staff role sets.
    #[must_use]
    pub fn no_ttl(mut self) -> Self {
        self.ttl = None;
        self.tti = None;
        self
    }

    /// Config for per-guild settings documents: small, short-lived.
    pub fn guild_config() -> Self {
        Self {
            max_capacity: 1_000,
            ttl: Some(Duration::from_secs(300)),
            tti: None,
        }
    }
}
