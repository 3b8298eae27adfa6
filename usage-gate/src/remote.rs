#![doc = "Remote record store integration: bridges the counter-store port to the account-scoped usage API for authenticated actors."]
//
//! # Remote Record Store (CLI <-> Core)
//!
//! This module provides the bridge between the CLI workflow and the storage
//! port abstraction in [`usage_gate_core::contract`]. It wires up the
//! `CounterStore` trait for real use against the remote record API (a
//! PostgREST-style backend), and provides the `RecordStoreClient` used for
//! authenticated actors' counts.
//!
//! - Anonymous actors never touch this module; their counts live in the local
//!   store from core.
//! - The [`CounterStore`] trait is designed for async and testable usage; see
//!   core docs for the port contract.
//!
//! ## Client Usage
//!
//! - Construct [`RecordStoreClient`] using environment variables
//!   (`USAGE_API_BASE_URL`, `USAGE_API_KEY`).
//! - Records live in the `usage_tracking` table, keyed by `user_id`, holding
//!   `usage_count`. Writes are upserts: create-if-absent, overwrite-if-present.
//! - All transport, serialization, and error mapping are encapsulated here;
//!   failures surface as the typed [`StoreError`] taxonomy and policy is left
//!   to the Gate.

use async_trait::async_trait;
use serde::Deserialize;
use std::env;

use usage_gate_core::contract::{CounterStore, StoreError};

const USAGE_TABLE: &str = "usage_tracking";

/// One row of the remote usage table, as returned by a filtered select.
#[derive(Debug, Deserialize)]
struct UsageRow {
    usage_count: u32,
}

pub struct RecordStoreClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RecordStoreClient {
    pub fn new_from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok(); // loads environment variables from .env if present
        match (env::var("USAGE_API_BASE_URL"), env::var("USAGE_API_KEY")) {
            (Ok(base_url), Ok(api_key)) => {
                let base_url = base_url.trim_end_matches('/').to_string();
                tracing::info!(
                    base_url = %base_url,
                    api_key_set = !api_key.is_empty(),
                    "Initialized RecordStoreClient from environment"
                );
                Ok(RecordStoreClient {
                    http: reqwest::Client::new(),
                    base_url,
                    api_key,
                })
            }
            (Err(e), _) => {
                tracing::error!(error = ?e, "USAGE_API_BASE_URL missing in environment");
                Err(Box::new(e))
            }
            (_, Err(e)) => {
                tracing::error!(error = ?e, "USAGE_API_KEY missing in environment");
                Err(Box::new(e))
            }
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, USAGE_TABLE)
    }
}

#[async_trait]
impl CounterStore for RecordStoreClient {
    async fn fetch_count(&self, actor_key: &str) -> Result<Option<u32>, StoreError> {
        tracing::info!(user_id = actor_key, "Fetching remote usage record");
        let url = format!(
            "{}?user_id=eq.{}&select=usage_count",
            self.table_url(),
            actor_key
        );

        let response = self
            .http
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, user_id = actor_key, "Failed to reach record store");
                StoreError::RemoteReadFailed(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, user_id = actor_key, "Record store returned error on fetch");
            return Err(StoreError::RemoteReadFailed(format!(
                "fetch returned status {status}"
            )));
        }

        let rows: Vec<UsageRow> = response.json().await.map_err(|e| {
            tracing::error!(error = ?e, user_id = actor_key, "Failed to decode usage rows");
            StoreError::RemoteReadFailed(format!("decode failed: {e}"))
        })?;

        match rows.first() {
            Some(row) => {
                tracing::info!(
                    user_id = actor_key,
                    usage_count = row.usage_count,
                    "Fetched remote usage record"
                );
                Ok(Some(row.usage_count))
            }
            None => {
                tracing::info!(user_id = actor_key, "No remote usage record");
                Ok(None)
            }
        }
    }

    async fn store_count(&self, actor_key: &str, count: u32) -> Result<(), StoreError> {
        tracing::info!(
            user_id = actor_key,
            usage_count = count,
            "Upserting remote usage record"
        );
        let url = format!("{}?on_conflict=user_id", self.table_url());
        let body = serde_json::json!([{
            "user_id": actor_key,
            "usage_count": count,
        }]);

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "resolution=merge-duplicates")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, user_id = actor_key, "Failed to reach record store");
                StoreError::RemoteWriteFailed(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = %status, user_id = actor_key, "Record store returned error on upsert");
            return Err(StoreError::RemoteWriteFailed(format!(
                "upsert returned status {status}"
            )));
        }

        tracing::info!(
            user_id = actor_key,
            usage_count = count,
            "Successfully upserted usage record"
        );
        Ok(())
    }
}
