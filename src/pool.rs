//! Core proxy pool implementation.
//!
//! `ProxyPool` keeps the registry of active and disabled providers together
//! with the flat pool built from them. Both live behind one lock, so a scan
//! never observes a half rebuilt pool.

use crate::config::{ProxyPoolConfig, RedistributionStrategy};
use crate::error::{CapabilityError, PoolError, ProviderWarning, WarningKind};
use crate::provider::{check_capability, ProxyProvider};
use crate::proxy::ManagedProxy;
use crate::state::LifecycleState;

use indexmap::IndexMap;
use log::{debug, info, warn};
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use std::sync::Arc;

/// Snapshot of the pool size and how much of it can be issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub total: usize,
    pub available: usize,
}

struct Registry {
    active: IndexMap<String, Arc<dyn ProxyProvider>>,
    disabled: IndexMap<String, Arc<dyn ProxyProvider>>,
    pool: Vec<Arc<ManagedProxy>>,
}

impl Registry {
    fn fill_pool(&mut self) {
        self.pool.clear();
        for provider in self.active.values() {
            self.pool.extend(provider.proxies());
        }
        debug!(
            "Pool rebuilt from {} providers: {} proxies",
            self.active.len(),
            self.pool.len()
        );
    }
}

/// Issues proxies drawn from a set of providers.
pub struct ProxyPool {
    inner: Mutex<Registry>,
    /// Configuration for the pool.
    pub config: ProxyPoolConfig,
}

impl ProxyPool {
    /// Create a pool over `providers` and build the initial pool.
    ///
    /// Providers sharing a name overwrite each other, the last one wins.
    pub fn new<I>(providers: I, config: ProxyPoolConfig) -> Result<Self, CapabilityError>
    where
        I: IntoIterator<Item = Arc<dyn ProxyProvider>>,
    {
        let mut active = IndexMap::new();
        for provider in providers {
            check_capability(provider.as_ref())?;
            active.insert(provider.name().to_string(), provider);
        }

        let mut registry = Registry {
            active,
            disabled: IndexMap::new(),
            pool: Vec::new(),
        };
        registry.fill_pool();
        info!(
            "Proxy pool initialized with {} providers, {} proxies",
            registry.active.len(),
            registry.pool.len()
        );

        Ok(Self {
            inner: Mutex::new(registry),
            config,
        })
    }

    /// Create a pool over a single provider.
    pub fn with_provider<P>(provider: P, config: ProxyPoolConfig) -> Result<Self, CapabilityError>
    where
        P: ProxyProvider + 'static,
    {
        Self::new([Arc::new(provider) as Arc<dyn ProxyProvider>], config)
    }

    /// Return the first proxy whose health is below the threshold.
    ///
    /// Reading a proxy's state may change it (see [`ManagedProxy::state`]).
    /// When the match lies past the first third of the pool the pool is
    /// reordered according to the configured [`RedistributionStrategy`].
    pub fn select_one(&self) -> Result<Arc<ManagedProxy>, PoolError> {
        let mut inner = self.inner.lock();
        self.select_locked(&mut inner)
    }

    /// Select a proxy and mark it issued in one step.
    pub fn issue(&self) -> Result<Arc<ManagedProxy>, PoolError> {
        let mut inner = self.inner.lock();
        let proxy = self.select_locked(&mut inner)?;
        proxy.mark_issued();
        Ok(proxy)
    }

    fn select_locked(&self, inner: &mut Registry) -> Result<Arc<ManagedProxy>, PoolError> {
        let total = inner.pool.len();

        let mut found = None;
        for (i, proxy) in inner.pool.iter().enumerate() {
            let state = proxy.state()?;
            if self.config.is_eligible(&state) {
                found = Some(i);
                break;
            }
        }

        match found {
            Some(i) => {
                let proxy = Arc::clone(&inner.pool[i]);
                if i > total / 3 {
                    self.redistribute(&mut inner.pool, i);
                }
                Ok(proxy)
            }
            None if total == 0 => Err(PoolError::PoolEmpty),
            None => Err(PoolError::NoneAvailable { total }),
        }
    }

    fn redistribute(&self, pool: &mut [Arc<ManagedProxy>], matched: usize) {
        match self.config.redistribution {
            RedistributionStrategy::Rotate => {
                debug!("Rotating pool by {} after late match", matched + 1);
                pool.rotate_left(matched + 1);
            }
            RedistributionStrategy::Shuffle => {
                debug!("Shuffling pool after late match at {}", matched);
                pool.shuffle(&mut rand::rng());
            }
            RedistributionStrategy::Disabled => {}
        }
    }

    /// Add a provider, replacing any provider with the same name, and rebuild.
    pub fn add_provider(&self, provider: Arc<dyn ProxyProvider>) -> Result<(), CapabilityError> {
        check_capability(provider.as_ref())?;

        let name = provider.name().to_string();
        let mut inner = self.inner.lock();
        if inner.disabled.shift_remove(&name).is_some() {
            info!("Provider {} replaced while disabled", name);
        }
        inner.active.insert(name.clone(), provider);
        inner.fill_pool();
        info!("Provider {} added, pool now holds {} proxies", name, inner.pool.len());
        Ok(())
    }

    /// Remove an active provider and rebuild. Unknown names are ignored.
    pub fn remove_provider(&self, name: &str) {
        let mut inner = self.inner.lock();
        if inner.active.shift_remove(name).is_some() {
            info!("Provider {} removed", name);
        }
        inner.fill_pool();
    }

    /// Move a provider from the active set to the disabled set.
    ///
    /// Returns a warning, and changes nothing, when the provider is already
    /// disabled or unknown.
    pub fn disable(&self, name: &str) -> Option<ProviderWarning> {
        let mut inner = self.inner.lock();
        match inner.active.shift_remove(name) {
            Some(provider) => {
                inner.disabled.insert(name.to_string(), provider);
                inner.fill_pool();
                info!("Provider {} disabled, pool now holds {} proxies", name, inner.pool.len());
                None
            }
            None => {
                let kind = if inner.disabled.contains_key(name) {
                    WarningKind::AlreadyDisabled
                } else {
                    WarningKind::Unknown
                };
                Some(no_op_warning(name, kind))
            }
        }
    }

    /// Move a provider from the disabled set back to the active set.
    ///
    /// Returns a warning, and changes nothing, when the provider is already
    /// enabled or unknown.
    pub fn enable(&self, name: &str) -> Option<ProviderWarning> {
        let mut inner = self.inner.lock();
        match inner.disabled.shift_remove(name) {
            Some(provider) => {
                inner.active.insert(name.to_string(), provider);
                inner.fill_pool();
                info!("Provider {} enabled, pool now holds {} proxies", name, inner.pool.len());
                None
            }
            None => {
                let kind = if inner.active.contains_key(name) {
                    WarningKind::AlreadyEnabled
                } else {
                    WarningKind::Unknown
                };
                Some(no_op_warning(name, kind))
            }
        }
    }

    /// Rebuild the pool from the active providers' current lists.
    pub fn refill(&self) {
        self.inner.lock().fill_pool();
    }

    /// Return a proxy to service.
    pub fn release(&self, proxy: &ManagedProxy) {
        proxy.mark_ready();
    }

    /// Rest a proxy for the configured exhaust timeout.
    pub fn exhaust(&self, proxy: &ManagedProxy) {
        proxy.exhaust(self.config.exhaust_timeout);
    }

    /// Quarantine a proxy for the configured grace period.
    pub fn quarantine(&self, proxy: &ManagedProxy) {
        proxy.quarantine(self.config.quarantine_timeout);
    }

    /// Take a proxy out of service.
    pub fn mark_broken(&self, proxy: &ManagedProxy) {
        proxy.set_state(LifecycleState::Broken);
    }

    /// Number of proxies in the pool.
    pub fn len(&self) -> usize {
        self.inner.lock().pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().pool.is_empty()
    }

    /// Names of the active providers, in pool order.
    pub fn active_providers(&self) -> Vec<String> {
        self.inner.lock().active.keys().cloned().collect()
    }

    /// Names of the disabled providers.
    pub fn disabled_providers(&self) -> Vec<String> {
        self.inner.lock().disabled.keys().cloned().collect()
    }

    /// Addresses in current pool order.
    pub fn addresses(&self) -> Vec<String> {
        self.inner
            .lock()
            .pool
            .iter()
            .map(|p| p.address().to_string())
            .collect()
    }

    /// Get statistics about the proxy pool.
    pub fn stats(&self) -> PoolStats {
        let inner = self.inner.lock();
        let available = inner
            .pool
            .iter()
            .filter(|p| matches!(p.state(), Ok(s) if self.config.is_eligible(&s)))
            .count();

        PoolStats {
            total: inner.pool.len(),
            available,
        }
    }
}

fn no_op_warning(name: &str, kind: WarningKind) -> ProviderWarning {
    let warning = ProviderWarning {
        name: name.to_string(),
        kind,
    };
    warn!("{}", warning);
    warning
}
