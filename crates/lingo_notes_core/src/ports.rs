//! crates/lingo_notes_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! collection store and its synchronization independent of the concrete storage
//! backend and of the remote translation API.

use crate::domain::TranslationResult;
use async_trait::async_trait;
use std::fmt;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Failed to read stored value '{key}': {reason}")]
    StorageRead { key: String, reason: String },
    #[error("Failed to write stored value '{key}': {reason}")]
    StorageWrite { key: String, reason: String },
    #[error("Translation request failed: {0}")]
    Transport(String),
    #[error("Translation API answered with unexpected status {0}")]
    UnexpectedStatus(u16),
    #[error("Translation API response was malformed: {0}")]
    MalformedResponse(String),
    #[error("{0}")]
    Validation(String),
    #[error("Item not found: {0}")]
    NotFound(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Storage Keys
//=========================================================================================

/// The keys the application persists under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    StoredNotes,
    DeletedNotes,
    Date,
    History,
    SavedItems,
}

impl StorageKey {
    /// Every key, in load order: `date` comes first because migrated notes
    /// borrow their timestamp from it.
    pub const ALL: [StorageKey; 5] = [
        StorageKey::Date,
        StorageKey::StoredNotes,
        StorageKey::DeletedNotes,
        StorageKey::History,
        StorageKey::SavedItems,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::StoredNotes => "storedNotes",
            StorageKey::DeletedNotes => "deletedNotes",
            StorageKey::Date => "date",
            StorageKey::History => "history",
            StorageKey::SavedItems => "savedItems",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable string storage addressed by key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when nothing was ever stored under `key`.
    async fn get(&self, key: &str) -> PortResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> PortResult<()>;
}

#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Translates `text` from language `from` to language `to` with a single request.
    async fn translate(&self, text: &str, from: &str, to: &str) -> PortResult<TranslationResult>;
}
