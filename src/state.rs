//! Lifecycle states of a managed proxy.
//!
//! A state is more than a label: it knows its own health ordinal, it can
//! re-evaluate itself when read ([`LifecycleState::self_check`]) and it
//! decides what an assignment actually results in
//! ([`LifecycleState::change_to`]).
//!
//! ```text
//! Exhausted --(deadline passed, on read)--> Ready
//! Quarantined --(assigned Quarantined)--> Broken
//! ```

use std::fmt;
use std::time::{Duration, Instant};

/// Health ordinal of [`LifecycleState::Pristine`].
pub const PRISTINE: u32 = 0;
/// Health ordinal of [`LifecycleState::Ready`].
pub const READY: u32 = 100;
/// Health ordinal of [`LifecycleState::Issued`].
pub const ISSUED: u32 = 200;
/// Health ordinal of [`LifecycleState::Exhausted`].
pub const EXHAUSTED: u32 = 300;
/// Health ordinal of [`LifecycleState::Quarantined`] once its deadline has passed.
pub const QUARANTINE_EXPIRED: u32 = 400;
/// Health ordinal of [`LifecycleState::Broken`].
pub const BROKEN: u32 = 500;

/// Current lifecycle state of a proxy. Lower health ordinal means more available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Never used.
    Pristine,
    /// Available for issuing.
    Ready,
    /// Currently in use.
    Issued,
    /// Temporarily used up. Reads as `Ready` once `recover_at` has passed.
    Exhausted {
        /// Moment after which the proxy recovers.
        recover_at: Instant,
    },
    /// Suspected failure. Still selectable (ordinal 100) until `recover_at`,
    /// failing (ordinal 400) afterwards. Never promoted to `Ready` on its own.
    Quarantined {
        /// Moment after which the quarantine counts as failed.
        recover_at: Instant,
    },
    /// Known broken.
    Broken,
}

impl LifecycleState {
    /// Exhausted state recovering `timeout` from now.
    pub fn exhausted(timeout: Duration) -> Self {
        LifecycleState::Exhausted {
            recover_at: Instant::now() + timeout,
        }
    }

    /// Quarantined state whose grace period ends `timeout` from now.
    pub fn quarantined(timeout: Duration) -> Self {
        LifecycleState::Quarantined {
            recover_at: Instant::now() + timeout,
        }
    }

    /// Health ordinal of this state at the current moment.
    pub fn health(&self) -> u32 {
        self.health_at(Instant::now())
    }

    /// Health ordinal of this state at `now`.
    pub fn health_at(&self, now: Instant) -> u32 {
        match self {
            LifecycleState::Pristine => PRISTINE,
            LifecycleState::Ready => READY,
            LifecycleState::Issued => ISSUED,
            LifecycleState::Exhausted { .. } => EXHAUSTED,
            LifecycleState::Quarantined { recover_at } => {
                if *recover_at > now {
                    READY
                } else {
                    QUARANTINE_EXPIRED
                }
            }
            LifecycleState::Broken => BROKEN,
        }
    }

    /// Re-evaluate this state on read.
    pub fn self_check(self) -> Self {
        self.self_check_at(Instant::now())
    }

    /// Re-evaluate this state as of `now`. Idempotent.
    pub fn self_check_at(self, now: Instant) -> Self {
        match self {
            LifecycleState::Exhausted { recover_at } if recover_at <= now => LifecycleState::Ready,
            other => other,
        }
    }

    /// Arbitrate an assignment of `proposed` over this state.
    ///
    /// Every state accepts the proposal except `Quarantined`, which turns a
    /// repeated quarantine into `Broken`.
    pub fn change_to(&self, proposed: LifecycleState) -> Self {
        match (self, proposed) {
            (LifecycleState::Quarantined { .. }, LifecycleState::Quarantined { .. }) => {
                LifecycleState::Broken
            }
            (_, proposed) => proposed,
        }
    }

    /// Short variant name.
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleState::Pristine => "pristine",
            LifecycleState::Ready => "ready",
            LifecycleState::Issued => "issued",
            LifecycleState::Exhausted { .. } => "exhausted",
            LifecycleState::Quarantined { .. } => "quarantined",
            LifecycleState::Broken => "broken",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
