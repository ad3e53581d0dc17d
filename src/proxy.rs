//! Managed proxy handle.

use crate::error::StateError;
use crate::state::LifecycleState;

use log::debug;
use parking_lot::Mutex;
use std::time::Duration;

/// A proxy address paired with its lifecycle state.
///
/// The state is only reachable through [`ManagedProxy::state`] and
/// [`ManagedProxy::set_state`], which let the current state re-evaluate
/// itself on read and arbitrate every assignment.
#[derive(Debug)]
pub struct ManagedProxy {
    address: String,
    state: Mutex<Option<LifecycleState>>,
}

impl ManagedProxy {
    /// Create a proxy with no state yet. Assign one before reading it.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            state: Mutex::new(None),
        }
    }

    /// Create a proxy with an initial state.
    pub fn with_state(address: impl Into<String>, state: LifecycleState) -> Self {
        Self {
            address: address.into(),
            state: Mutex::new(Some(state)),
        }
    }

    /// The proxy URL (e.g. "socks5://127.0.0.1:1080").
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Read the current state after letting it re-evaluate itself.
    /// The re-evaluated state is stored.
    pub fn state(&self) -> Result<LifecycleState, StateError> {
        let mut slot = self.state.lock();
        let current = slot.ok_or_else(|| StateError::Unset {
            address: self.address.clone(),
        })?;

        let checked = current.self_check();
        if checked != current {
            debug!("Proxy {} self-checked: {} -> {}", self.address, current, checked);
        }
        *slot = Some(checked);
        Ok(checked)
    }

    /// Propose a new state. The first assignment is stored verbatim; later
    /// ones go through the current state's arbitration.
    pub fn set_state(&self, proposed: LifecycleState) {
        let mut slot = self.state.lock();
        let next = match *slot {
            Some(current) => {
                let next = current.change_to(proposed);
                if next.name() != proposed.name() {
                    debug!(
                        "Proxy {} assignment {} -> {} redirected to {}",
                        self.address, current, proposed, next
                    );
                }
                next
            }
            None => proposed,
        };
        *slot = Some(next);
    }

    /// Whether a state was ever assigned.
    pub fn has_state(&self) -> bool {
        self.state.lock().is_some()
    }

    /// Health ordinal of the (self-checked) current state.
    pub fn health(&self) -> Result<u32, StateError> {
        self.state().map(|s| s.health())
    }

    /// Mark as ready for issuing.
    pub fn mark_ready(&self) {
        self.set_state(LifecycleState::Ready);
    }

    /// Mark as currently in use.
    pub fn mark_issued(&self) {
        self.set_state(LifecycleState::Issued);
    }

    /// Mark as broken.
    pub fn mark_broken(&self) {
        self.set_state(LifecycleState::Broken);
    }

    /// Mark as exhausted for `timeout`.
    pub fn exhaust(&self, timeout: Duration) {
        self.set_state(LifecycleState::exhausted(timeout));
    }

    /// Quarantine for `timeout`. Quarantining twice in a row breaks the proxy.
    pub fn quarantine(&self, timeout: Duration) {
        self.set_state(LifecycleState::quarantined(timeout));
    }

    /// Convert the proxy address to a reqwest::Proxy.
    pub fn to_reqwest_proxy(&self) -> Result<reqwest::Proxy, reqwest::Error> {
        reqwest::Proxy::all(&self.address)
    }
}
