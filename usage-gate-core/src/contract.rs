//! # contract: Universal interface for counter storage ports
//!
//! This module defines a single trait (`CounterStore`) and the supporting error
//! type for reading and writing per-actor usage counts against a backing store:
//! local file persistence, a remote record API, or a mock/test implementation.
//!
//! ## Interface & Extensibility
//! - Implement the [`CounterStore`] trait to create new storage backends.
//! - All methods are async, returning typed [`StoreError`] results.
//! - Error handling is uniform: implementors convert upstream failures into the
//!   taxonomy below; policy (fail-open vs fail-closed) is applied by the Gate,
//!   never inside a store.
//! - Meant for both production code and robust mocking in tests.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so consumers can generate
//!   deterministic mocks for unit/integration tests (`test-export-mocks`).
//!
//! ## Adding New Storage Backends
//! - Implement the trait for your backend.
//! - Map unreadable or unparsable stored values to `Ok(None)`, not an error:
//!   an absent count is a fresh actor, never a failure.
//! - Return concrete, understandable error variants on I/O or API issues.

use async_trait::async_trait;
use thiserror::Error;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Failures a storage port can surface.
///
/// All variants are caught at the Gate boundary and converted into the
/// configured failure-policy behavior; none of them reach Gate callers.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Local persistence blocked (disabled or failing filesystem).
    #[error("local persistence unavailable: {0}")]
    StorageUnavailable(#[from] std::io::Error),
    /// Network or backend error while fetching a remote record.
    #[error("remote read failed: {0}")]
    RemoteReadFailed(String),
    /// Network or backend error while upserting a remote record.
    #[error("remote write failed: {0}")]
    RemoteWriteFailed(String),
}

/// Trait for reading and writing a per-actor usage count.
///
/// The implementor is responsible for connecting to a backing service or local
/// persistence. Keys are opaque to the store: the fixed anonymous key or an
/// account id, as supplied by actor resolution.
///
/// The trait is implemented by real stores and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Fetch the stored count for `actor_key`.
    ///
    /// Returns `Ok(None)` when no record exists for the key; a never-seen
    /// actor is not an error.
    async fn fetch_count(&self, actor_key: &str) -> Result<Option<u32>, StoreError>;

    /// Persist `count` for `actor_key`, creating the record if absent and
    /// overwriting it if present.
    async fn store_count(&self, actor_key: &str, count: u32) -> Result<(), StoreError>;
}
