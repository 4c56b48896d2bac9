//! Configuration for the policy engine

use std::time::Duration;

/// Policy engine configuration
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// Feature flag cache TTL
    pub feature_cache_ttl: Duration,
    /// Usage record cache TTL
    pub usage_cache_ttl: Duration,
    /// Max entries per cache
    pub cache_capacity: u64,
    /// Days until a fresh usage record's counters reset
    pub reset_period_days: i64,
    /// Timeout for one background charge attempt
    pub charge_timeout: Duration,
    /// Buffered charge events before new ones are dropped
    pub charge_buffer: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            feature_cache_ttl: Duration::from_secs(5 * 60),
            usage_cache_ttl: Duration::from_secs(5 * 60),
            cache_capacity: 10_000,
            reset_period_days: 30,
            charge_timeout: Duration::from_secs(5),
            charge_buffer: 256,
        }
    }
}

impl PolicyConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the feature flag cache TTL
    pub fn with_feature_cache_ttl(mut self, ttl: Duration) -> Self {
        self.feature_cache_ttl = ttl;
        self
    }

    /// Set the usage record cache TTL
    pub fn with_usage_cache_ttl(mut self, ttl: Duration) -> Self {
        self.usage_cache_ttl = ttl;
        self
    }

    /// Set the max entries per cache
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Set the counter reset period in days
    pub fn with_reset_period_days(mut self, days: i64) -> Self {
        self.reset_period_days = days;
        self
    }

    /// Set the background charge timeout
    pub fn with_charge_timeout(mut self, timeout: Duration) -> Self {
        self.charge_timeout = timeout;
        self
    }
}
