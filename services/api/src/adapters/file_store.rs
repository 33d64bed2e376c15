//! services/api/src/adapters/file_store.rs
//!
//! This module contains the durable storage adapter. It implements the
//! `KeyValueStore` port from the `core` crate by keeping each key in its own
//! JSON file under a data directory.

use async_trait::async_trait;
use lingo_notes_core::ports::{KeyValueStore, PortError, PortResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A key-value store backed by one file per key.
#[derive(Clone, Debug)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Opens (and creates, if needed) the data directory at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> PortResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| PortError::StorageWrite {
                key: root.display().to_string(),
                reason: format!("Failed to create data directory: {}", e),
            })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file that holds `key`. Keys are restricted to plain identifiers so a
    /// key can never point outside the data directory.
    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| self.root.join(format!("{}.json", key)))
    }
}

//=========================================================================================
// `KeyValueStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        let path = self.path_for(key).ok_or_else(|| PortError::StorageRead {
            key: key.to_string(),
            reason: "Invalid storage key".to_string(),
        })?;

        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::StorageRead {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Writes to a sibling temp file and renames it over the target, so readers
    /// see either the old value or the new one.
    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let write_error = |reason: String| PortError::StorageWrite {
            key: key.to_string(),
            reason,
        };
        let path = self
            .path_for(key)
            .ok_or_else(|| write_error("Invalid storage key".to_string()))?;
        let temp_path = self.root.join(format!(".{}.json.tmp", key));

        tokio::fs::write(&temp_path, value)
            .await
            .map_err(|e| write_error(e.to_string()))?;
        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| write_error(e.to_string()))?;

        debug!(key, bytes = value.len(), "Stored value written");
        Ok(())
    }
}
