use serial_test::serial;
use std::env;

use usage_gate::remote::RecordStoreClient;

/// Construction succeeds when both credentials are present in the environment.
#[tokio::test]
#[serial]
async fn test_client_construction_from_env() {
    env::set_var("USAGE_API_BASE_URL", "https://records.example.com/");
    env::set_var("USAGE_API_KEY", "test-key");

    let client = RecordStoreClient::new_from_env();
    assert!(client.is_ok(), "Client should construct with env present");
}

/// Construction fails fast when the base URL is missing.
#[tokio::test]
#[serial]
async fn test_client_construction_fails_without_base_url() {
    env::remove_var("USAGE_API_BASE_URL");
    env::set_var("USAGE_API_KEY", "test-key");

    assert!(RecordStoreClient::new_from_env().is_err());
}

/// Construction fails fast when the API key is missing.
#[tokio::test]
#[serial]
async fn test_client_construction_fails_without_api_key() {
    env::set_var("USAGE_API_BASE_URL", "https://records.example.com");
    env::remove_var("USAGE_API_KEY");

    assert!(RecordStoreClient::new_from_env().is_err());
}
