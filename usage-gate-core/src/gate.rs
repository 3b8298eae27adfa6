//! Usage Gate: per-actor usage counting and the policy flags derived from it.
//!
//! This module provides the stateful core of the crate. It implements a small,
//! strictly forward-moving counter per actor that:
//!   - Loads the stored count for a resolved actor through a [`CounterStore`]
//!   - Derives the two gating flags (`requires_email`, `requires_subscription`)
//!     as a pure function of the count, recomputed on every read
//!   - Records one transformation per [`UsageGate::increment_usage`] call,
//!     persisting the new count with exactly one write
//!   - Applies the configured failure policy when persistence misbehaves.
//!
//! # Major Types
//! - [`UsageGate`]: holds config and the in-memory count for one session
//! - [`PolicyFlags`]: derived booleans returned from every operation
//!
//! # Responsibilities
//! - Never surfaces a storage error to the caller: read failures fall back to
//!   a zero count, write failures follow [`FailurePolicy`]
//! - Wraps every port call in a bounded timeout so a hung backend cannot
//!   block the caller indefinitely
//! - Does not select storage backends: callers resolve the actor once and pass
//!   the matching store in, so no local/remote branching happens here
//!
//! # Callable From
//! - Used by the CLI crate and integration tests
//! - Expects a concrete (async) [`CounterStore`] implementation
//!
//! # Error Handling
//! All operations return [`PolicyFlags`], never a `Result`. Failures are
//! logged and converted per the policy in [`GateConfig`].
//!
//! # Navigation
//! - Main entrypoints: [`UsageGate::initialize`], [`UsageGate::increment_usage`]
//! - Supporting types: [`PolicyFlags`], [`FailurePolicy`].

use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::actor::Actor;
use crate::config::{FailurePolicy, GateConfig};
use crate::contract::CounterStore;

/// Gating decisions derived from a usage count. Never stored; recomputed on
/// every read so they cannot go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolicyFlags {
    pub requires_email: bool,
    pub requires_subscription: bool,
}

/// Per-session usage gate for one actor.
///
/// The count only moves forward: there is no decrement, reset, or expiry.
/// A gate starts at zero, so `increment_usage` is safe to call even when
/// `initialize` never ran.
pub struct UsageGate {
    config: GateConfig,
    count: u32,
}

impl UsageGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config, count: 0 }
    }

    /// The in-memory count as of the last operation.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Flags for the current in-memory count.
    pub fn flags(&self) -> PolicyFlags {
        self.flags_for(self.count)
    }

    fn flags_for(&self, count: u32) -> PolicyFlags {
        PolicyFlags {
            requires_email: count >= self.config.email_threshold,
            requires_subscription: count >= self.config.subscription_threshold,
        }
    }

    fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.config.store_timeout_secs)
    }

    /// Load the stored count for `actor` and return the derived flags.
    ///
    /// An absent record reads as zero. A failed or timed-out read also falls
    /// back to zero: the read path is always fail-open, regardless of the
    /// configured write policy.
    pub async fn initialize<S>(&mut self, actor: &Actor, store: &S) -> PolicyFlags
    where
        S: CounterStore + ?Sized,
    {
        let key = actor.storage_key();
        info!(actor = ?actor, "[GATE] Initialising usage state");

        let loaded = match tokio::time::timeout(self.store_timeout(), store.fetch_count(key)).await
        {
            Ok(Ok(Some(count))) => {
                info!(actor_key = key, count, "[GATE] Loaded stored usage count");
                count
            }
            Ok(Ok(None)) => {
                info!(actor_key = key, "[GATE] No stored count, starting at zero");
                0
            }
            Ok(Err(e)) => {
                error!(actor_key = key, error = %e, "[GATE][ERROR] Count read failed, falling back to zero");
                0
            }
            Err(_) => {
                error!(actor_key = key, "[GATE][ERROR] Count read timed out, falling back to zero");
                0
            }
        };

        self.count = loaded;
        self.flags()
    }

    /// Record one completed transformation for `actor` and return the flags
    /// for the new count.
    ///
    /// Issues exactly one persistence write. On write failure or timeout the
    /// configured [`FailurePolicy`] decides whether the increment sticks.
    pub async fn increment_usage<S>(&mut self, actor: &Actor, store: &S) -> PolicyFlags
    where
        S: CounterStore + ?Sized,
    {
        let key = actor.storage_key();
        let new_count = self.count + 1;
        info!(actor_key = key, new_count, "[GATE] Recording transformation");

        let write =
            tokio::time::timeout(self.store_timeout(), store.store_count(key, new_count)).await;

        match write {
            Ok(Ok(())) => {
                self.count = new_count;
            }
            Ok(Err(e)) => {
                self.apply_write_failure_policy(key, new_count, &format!("{e}"));
            }
            Err(_) => {
                self.apply_write_failure_policy(key, new_count, "write timed out");
            }
        }

        self.flags()
    }

    fn apply_write_failure_policy(&mut self, key: &str, new_count: u32, cause: &str) {
        match self.config.failure_policy {
            FailurePolicy::FailOpen => {
                warn!(
                    actor_key = key,
                    new_count,
                    cause,
                    "[GATE] Count write failed, proceeding fail-open with unpersisted count"
                );
                self.count = new_count;
            }
            FailurePolicy::FailClosed => {
                warn!(
                    actor_key = key,
                    count = self.count,
                    cause,
                    "[GATE] Count write failed, fail-closed keeps previous count"
                );
            }
        }
    }
}
