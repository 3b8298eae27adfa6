//! File-backed local persistence for anonymous usage counts.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::contract::{CounterStore, StoreError};

/// Local key-value counter store: one file per key inside a base directory,
/// holding the count as its decimal string.
///
/// This is the anonymous-actor backend. Reads treat an absent or unparsable
/// value as no record at all; a fresh profile starts at zero without ever
/// erroring.
pub struct LocalCounterStore {
    base_dir: PathBuf,
}

impl LocalCounterStore {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn key_path(&self, actor_key: &str) -> PathBuf {
        self.base_dir.join(actor_key)
    }
}

#[async_trait]
impl CounterStore for LocalCounterStore {
    async fn fetch_count(&self, actor_key: &str) -> Result<Option<u32>, StoreError> {
        let path = self.key_path(actor_key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No local count file");
                return Ok(None);
            }
            Err(e) => return Err(StoreError::StorageUnavailable(e)),
        };

        match raw.trim().parse::<u32>() {
            Ok(count) => Ok(Some(count)),
            Err(_) => {
                warn!(
                    path = %path.display(),
                    raw = %raw.trim(),
                    "Unparsable local count, treating as absent"
                );
                Ok(None)
            }
        }
    }

    async fn store_count(&self, actor_key: &str, count: u32) -> Result<(), StoreError> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir)?;
            debug!(path = %self.base_dir.display(), "Created local store directory");
        }
        let path = self.key_path(actor_key);
        fs::write(&path, count.to_string())?;
        debug!(path = %path.display(), count, "Wrote local count");
        Ok(())
    }
}
