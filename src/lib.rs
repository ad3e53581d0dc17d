//! # proxy-lifecycle-pool
//!
//! A multi-provider proxy pool with self-managing proxy lifecycle states.
//!
//! Providers yield [`ManagedProxy`] handles. Every handle carries a
//! [`LifecycleState`] that re-evaluates itself when read and arbitrates every
//! assignment, so an exhausted proxy comes back on its own and a proxy
//! quarantined twice ends up broken. [`ProxyPool`] flattens the active
//! providers into one pool and issues the first proxy that is healthy enough.

pub mod config;
pub mod error;
pub mod pool;
pub mod provider;
pub mod proxy;
pub mod source;
pub mod state;
mod utils;

pub use config::{ProxyPoolConfig, ProxyPoolConfigBuilder, RedistributionStrategy};
pub use error::{CapabilityError, PoolError, ProviderWarning, SourceError, StateError, WarningKind};
pub use pool::{PoolStats, ProxyPool};
pub use provider::{ProxyProvider, StaticProvider};
pub use proxy::ManagedProxy;
pub use source::SourceProvider;
pub use state::LifecycleState;
