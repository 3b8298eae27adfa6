use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

use usage_gate_core::config::FailurePolicy;

/// This test ensures that a full static config produces the expected typed
/// gate and storage configuration.
#[tokio::test]
async fn test_load_config_success_with_all_fields() {
    let config_yaml = r#"
gate:
  email_threshold: 3
  subscription_threshold: 8
  failure_policy: fail_closed
  store_timeout_secs: 2
storage:
  local_dir: ./tmp/usage
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    let config =
        usage_gate::load_config::load_config(config_file.path()).expect("Config should load");

    assert_eq!(config.gate.email_threshold, 3);
    assert_eq!(config.gate.subscription_threshold, 8);
    assert_eq!(config.gate.failure_policy, FailurePolicy::FailClosed);
    assert_eq!(config.gate.store_timeout_secs, 2);
    assert_eq!(config.storage.local_dir, PathBuf::from("./tmp/usage"));
}

/// This test ensures core defaults fill in an omitted gate section.
#[tokio::test]
async fn test_load_config_defaults_without_gate_section() {
    let config_yaml = r#"
storage:
  local_dir: ./tmp/usage
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    let config = usage_gate::load_config::load_config(config_file.path())
        .expect("Loader should allow an omitted gate section");

    assert_eq!(config.gate.email_threshold, 5);
    assert_eq!(config.gate.subscription_threshold, 10);
    assert_eq!(config.gate.failure_policy, FailurePolicy::FailOpen);
    assert_eq!(config.gate.store_timeout_secs, 5);
}

/// This test ensures an unrecognised failure policy string maps to the lenient
/// default instead of failing the load.
#[tokio::test]
async fn test_load_config_unknown_failure_policy_defaults_to_fail_open() {
    let config_yaml = r#"
gate:
  failure_policy: panic-loudly
storage:
  local_dir: ./tmp/usage
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    let config = usage_gate::load_config::load_config(config_file.path())
        .expect("Unknown policy string should not fail the load");
    assert_eq!(config.gate.failure_policy, FailurePolicy::FailOpen);
}

/// This test ensures that if the config file is not valid YAML, load_config
/// errors and reports as such.
#[tokio::test]
async fn test_load_config_errors_for_invalid_file() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), b"not-yaml: [:::").unwrap();

    let err = usage_gate::load_config::load_config(config_file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

/// This test ensures a missing storage section fails the load: the local
/// counter store has no sensible default directory.
#[tokio::test]
async fn test_load_config_errors_without_storage_section() {
    let config_yaml = r#"
gate:
  email_threshold: 5
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    assert!(usage_gate::load_config::load_config(config_file.path()).is_err());
}
