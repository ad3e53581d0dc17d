//! Proxy providers.

use crate::error::CapabilityError;
use crate::proxy::ManagedProxy;
use crate::state::LifecycleState;

use std::sync::Arc;

/// A named source of proxies.
///
/// `proxies` may be slow (a provider is free to hit the network); the pool
/// calls it synchronously on every rebuild and applies no timeout or retry.
pub trait ProxyProvider: Send + Sync {
    /// Stable name, unique among the providers of a pool.
    fn name(&self) -> &str;

    /// Current proxies, in the order they should be offered.
    fn proxies(&self) -> Vec<Arc<ManagedProxy>>;
}

/// Check a provider before it is admitted into a pool.
pub(crate) fn check_capability(provider: &dyn ProxyProvider) -> Result<(), CapabilityError> {
    if provider.name().trim().is_empty() {
        return Err(CapabilityError::EmptyName);
    }
    Ok(())
}

/// Provider over a fixed list of proxies.
#[derive(Debug)]
pub struct StaticProvider {
    name: String,
    proxies: Vec<Arc<ManagedProxy>>,
}

impl StaticProvider {
    pub fn new(name: impl Into<String>, proxies: Vec<Arc<ManagedProxy>>) -> Self {
        Self {
            name: name.into(),
            proxies,
        }
    }

    /// Build a provider from addresses, every proxy starting in `state`.
    pub fn from_addresses<I, S>(name: impl Into<String>, addresses: I, state: LifecycleState) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let proxies = addresses
            .into_iter()
            .map(|address| Arc::new(ManagedProxy::with_state(address, state)))
            .collect();
        Self::new(name, proxies)
    }
}

impl ProxyProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn proxies(&self) -> Vec<Arc<ManagedProxy>> {
        self.proxies.clone()
    }
}
