/// `load_config` module: Loads and adapts a static YAML config into the
/// typed gate and storage configuration.
///
/// This module is the only place where untrusted YAML is parsed and mapped to
/// rich, strongly-typed internal structs.
///
/// # Responsibilities
/// - Parse user-supplied YAML configuration files into type-safe Rust structs
/// - Map loosely-typed YAML keys (e.g., the string failure policy) to enums
/// - Apply core defaults for omitted gate fields
/// - Ensure robust error messages for CLI and tests: any failure in loading
///   must result in clear diagnostics.
/// - Acts as the adapter layer decoupling input schemas from domain core
///
/// # Errors
/// All errors in this module use `anyhow::Error` for context-rich diagnostics,
/// and are surfaced at the CLI boundary.
///
/// Remote credentials are never part of this file; they come from the
/// environment (see the `remote` module).
///
/// ---
///
/// Internal implementation begins below.
///
use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use usage_gate_core::config::{FailurePolicy, GateConfig};

#[derive(Debug)]
pub struct CliConfig {
    pub gate: GateConfig,
    pub storage: StorageSection,
}

#[derive(Debug, Deserialize)]
pub struct StorageSection {
    /// Directory the local (anonymous) counter store lives in.
    pub local_dir: PathBuf,
}

/// YAML-side gate section: every field optional, core defaults fill the gaps.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GateSection {
    pub email_threshold: Option<u32>,
    pub subscription_threshold: Option<u32>,
    pub failure_policy: Option<String>,
    pub store_timeout_secs: Option<u64>,
}

/// Loads a static YAML config file (no secrets) and adapts it into the typed
/// configuration used by the gate and the CLI.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    #[derive(Debug, Deserialize)]
    struct RawConfig {
        #[serde(default)]
        gate: GateSection,
        storage: StorageSection,
    }

    let raw: RawConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let defaults = GateConfig::default();
    let gate = GateConfig {
        email_threshold: raw.gate.email_threshold.unwrap_or(defaults.email_threshold),
        subscription_threshold: raw
            .gate
            .subscription_threshold
            .unwrap_or(defaults.subscription_threshold),
        failure_policy: raw
            .gate
            .failure_policy
            .as_deref()
            .map(FailurePolicy::from)
            .unwrap_or_default(),
        store_timeout_secs: raw
            .gate
            .store_timeout_secs
            .unwrap_or(defaults.store_timeout_secs),
    };
    if gate.subscription_threshold < gate.email_threshold {
        tracing::warn!(
            email_threshold = gate.email_threshold,
            subscription_threshold = gate.subscription_threshold,
            "Subscription threshold below email threshold; subscription gating will no longer imply email gating"
        );
    }
    gate.trace_loaded();

    Ok(CliConfig {
        gate,
        storage: raw.storage,
    })
}
