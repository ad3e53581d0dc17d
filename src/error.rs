//! Error types for the proxy-lifecycle-pool crate.

use std::fmt;
use thiserror::Error;

/// A provider does not satisfy the provider contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// The provider reported an empty or blank name.
    #[error("Provider must have a non-empty name")]
    EmptyName,
}

/// Error returned when no proxy can be issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// No active provider yielded any proxy.
    #[error("The pool is empty. Check providers")]
    PoolEmpty,
    /// Proxies exist but none is eligible at the moment.
    #[error("No proxy available at that moment ({total} in pool)")]
    NoneAvailable {
        /// Pool length at the time of the scan.
        total: usize,
    },
    /// A proxy in the pool was never given a state.
    #[error(transparent)]
    State(#[from] StateError),
}

/// A proxy state was read before one was ever assigned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Proxy {address} has no lifecycle state; assign one before reading it")]
    Unset { address: String },
}

/// Failure to load a proxy list source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to fetch {source_name}: {error}")]
    Fetch {
        source_name: String,
        #[source]
        error: reqwest::Error,
    },
    #[error("Failed to read {source_name}: {error}")]
    Read {
        source_name: String,
        #[source]
        error: std::io::Error,
    },
}

/// Why an enable/disable request was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    AlreadyEnabled,
    AlreadyDisabled,
    Unknown,
}

/// Non-fatal signal returned by [`crate::ProxyPool::enable`] and
/// [`crate::ProxyPool::disable`] when the call was a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderWarning {
    pub name: String,
    pub kind: WarningKind,
}

impl fmt::Display for ProviderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            WarningKind::AlreadyEnabled => write!(f, "The provider {} is already enabled", self.name),
            WarningKind::AlreadyDisabled => write!(f, "The provider {} is already disabled", self.name),
            WarningKind::Unknown => write!(f, "No such provider {}", self.name),
        }
    }
}
