//! Configuration for the proxy pool.

use crate::state::LifecycleState;

use std::time::Duration;

/// How the pool is reordered when a proxy is found past its first third.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedistributionStrategy {
    /// Rotate the pool so everything up to and including the match moves
    /// behind the entries that were not examined. The match itself ends up
    /// last, and the next scan starts at the entry that followed it.
    Rotate,
    /// Shuffle the whole pool.
    Shuffle,
    /// Keep the pool order.
    Disabled,
}

/// Configuration for the proxy pool.
#[derive(Debug, Clone)]
pub struct ProxyPoolConfig {
    /// Proxies whose health ordinal is strictly below this value are issued.
    pub state_threshold: u32,
    /// Recovery timeout applied by [`crate::ProxyPool::exhaust`].
    pub exhaust_timeout: Duration,
    /// Grace period applied by [`crate::ProxyPool::quarantine`].
    pub quarantine_timeout: Duration,
    /// Reordering policy.
    pub redistribution: RedistributionStrategy,
}

impl ProxyPoolConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProxyPoolConfigBuilder {
        ProxyPoolConfigBuilder::new()
    }

    /// Whether `state` may be issued under this configuration.
    pub fn is_eligible(&self, state: &LifecycleState) -> bool {
        state.health() < self.state_threshold
    }
}

impl Default for ProxyPoolConfig {
    fn default() -> Self {
        ProxyPoolConfigBuilder::new().build()
    }
}

/// Builder for `ProxyPoolConfig`.
pub struct ProxyPoolConfigBuilder {
    state_threshold: Option<u32>,
    exhaust_timeout: Option<Duration>,
    quarantine_timeout: Option<Duration>,
    redistribution: Option<RedistributionStrategy>,
}

impl ProxyPoolConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            state_threshold: None,
            exhaust_timeout: None,
            quarantine_timeout: None,
            redistribution: None,
        }
    }

    /// Set the exclusive health ordinal bound for issuing.
    pub fn state_threshold(mut self, threshold: u32) -> Self {
        self.state_threshold = Some(threshold);
        self
    }

    /// Set how long an exhausted proxy rests.
    pub fn exhaust_timeout(mut self, timeout: Duration) -> Self {
        self.exhaust_timeout = Some(timeout);
        self
    }

    /// Set the quarantine grace period.
    pub fn quarantine_timeout(mut self, timeout: Duration) -> Self {
        self.quarantine_timeout = Some(timeout);
        self
    }

    /// Set the reordering policy.
    pub fn redistribution(mut self, strategy: RedistributionStrategy) -> Self {
        self.redistribution = Some(strategy);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ProxyPoolConfig {
        ProxyPoolConfig {
            state_threshold: self.state_threshold.unwrap_or(250),
            exhaust_timeout: self.exhaust_timeout.unwrap_or(Duration::from_secs(60)),
            quarantine_timeout: self.quarantine_timeout.unwrap_or(Duration::from_secs(300)),
            redistribution: self.redistribution.unwrap_or(RedistributionStrategy::Rotate),
        }
    }
}

impl Default for ProxyPoolConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
