use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What the Gate does when a persistence write fails or times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Advance the in-memory count and return flags for it anyway. Gating may
    /// under-trigger during an outage; the user is never blocked.
    #[default]
    FailOpen,
    /// Treat the failed write as a non-increment: count and flags unchanged.
    FailClosed,
}

impl From<&str> for FailurePolicy {
    fn from(s: &str) -> Self {
        match s {
            "FailOpen" | "fail_open" | "fail-open" => FailurePolicy::FailOpen,
            "FailClosed" | "fail_closed" | "fail-closed" => FailurePolicy::FailClosed,
            other => {
                tracing::warn!(
                    policy = other,
                    "Unknown failure policy, defaulting to FailOpen"
                );
                FailurePolicy::FailOpen
            }
        }
    }
}

/// Gate configuration: thresholds, failure policy, and the bounded timeout
/// applied around every storage-port call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default = "default_email_threshold")]
    pub email_threshold: u32,
    #[serde(default = "default_subscription_threshold")]
    pub subscription_threshold: u32,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default = "default_store_timeout_secs")]
    pub store_timeout_secs: u64,
}

fn default_email_threshold() -> u32 {
    5
}

fn default_subscription_threshold() -> u32 {
    10
}

fn default_store_timeout_secs() -> u64 {
    5
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            email_threshold: default_email_threshold(),
            subscription_threshold: default_subscription_threshold(),
            failure_policy: FailurePolicy::default(),
            store_timeout_secs: default_store_timeout_secs(),
        }
    }
}

impl GateConfig {
    pub fn trace_loaded(&self) {
        info!(
            email_threshold = self.email_threshold,
            subscription_threshold = self.subscription_threshold,
            failure_policy = ?self.failure_policy,
            store_timeout_secs = self.store_timeout_secs,
            "Loaded GateConfig"
        );
        debug!(?self, "GateConfig loaded (full debug)");
    }
}
