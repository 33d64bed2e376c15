//! crates/lingo_notes_core/src/sync.rs
//!
//! Bridges the `CollectionStore` and a `KeyValueStore`: one load pass at
//! startup, then a whole-collection write for every key an action touched.
//!
//! Neither direction ever fails outright. Unreadable or malformed values fall
//! back to the empty default, and failed writes are logged and reported while
//! the in-memory mutation stands.

use crate::domain::{NoteEntry, StoredNote, StoredTranslation, TranslationRecord};
use crate::ports::{KeyValueStore, PortError, PortResult, StorageKey};
use crate::store::CollectionStore;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

/// What `load_on_start` found under each key.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<StorageKey>,
    pub absent: Vec<StorageKey>,
    pub malformed: Vec<StorageKey>,
    /// Keys that held an older entry shape or duplicate ids and will be
    /// rewritten on the next save.
    pub migrated: Vec<StorageKey>,
}

/// The result of writing back pending changes.
#[derive(Debug, Default)]
pub struct SaveReport {
    pub written: Vec<StorageKey>,
    pub failed: Vec<(StorageKey, PortError)>,
}

impl SaveReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

//=========================================================================================
// Load-on-start
//=========================================================================================

/// Reads every persisted key and replaces the matching in-memory collection
/// when a value is present and decodes.
pub async fn load_on_start(store: &mut CollectionStore, kv: &dyn KeyValueStore) -> LoadReport {
    let mut report = LoadReport::default();
    let mut stored_date: Option<DateTime<Utc>> = None;

    for key in StorageKey::ALL {
        let raw = match kv.get(key.as_str()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(%key, "Nothing stored yet");
                report.absent.push(key);
                continue;
            }
            Err(e) => {
                warn!(%key, "Failed to read stored value, keeping default: {}", e);
                report.malformed.push(key);
                continue;
            }
        };

        let fallback_created_at = stored_date.unwrap_or_else(Utc::now);
        let applied = match key {
            StorageKey::Date => decode_date(&raw).map(|date| {
                stored_date = Some(date);
                store.set_date(date);
                false
            }),
            // A list that held duplicate ids is rewritten in its deduplicated form.
            StorageKey::StoredNotes => decode_notes(key, &raw, fallback_created_at)
                .map(|(notes, migrated)| store.replace_notes(notes) || migrated),
            StorageKey::DeletedNotes => decode_notes(key, &raw, fallback_created_at)
                .map(|(notes, migrated)| store.replace_deleted(notes) || migrated),
            StorageKey::History => decode_translations(key, &raw)
                .map(|(items, migrated)| store.replace_history(items) || migrated),
            StorageKey::SavedItems => decode_translations(key, &raw)
                .map(|(items, migrated)| store.replace_saved(items) || migrated),
        };

        match applied {
            Ok(migrated) => {
                report.loaded.push(key);
                if migrated {
                    report.migrated.push(key);
                }
            }
            Err(e) => {
                warn!(%key, "Stored value is malformed, keeping default: {}", e);
                report.malformed.push(key);
            }
        }
    }

    // Loading is not a change; only migrated keys need writing back.
    store.take_changes();
    for key in &report.migrated {
        store.mark_dirty(*key);
    }

    info!(
        loaded = report.loaded.len(),
        absent = report.absent.len(),
        malformed = report.malformed.len(),
        migrated = report.migrated.len(),
        "Loaded stored collections"
    );
    report
}

fn decode_date(raw: &str) -> PortResult<DateTime<Utc>> {
    let text: String = serde_json::from_str(raw).map_err(|e| read_error(StorageKey::Date, e))?;
    DateTime::parse_from_rfc2822(&text)
        .or_else(|_| DateTime::parse_from_rfc3339(&text))
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| read_error(StorageKey::Date, e))
}

fn decode_notes(
    key: StorageKey,
    raw: &str,
    fallback_created_at: DateTime<Utc>,
) -> PortResult<(Vec<NoteEntry>, bool)> {
    let stored: Vec<StoredNote> = serde_json::from_str(raw).map_err(|e| read_error(key, e))?;
    let migrated = stored.iter().any(StoredNote::is_legacy);
    let notes = stored
        .into_iter()
        .filter_map(|note| note.into_entry(fallback_created_at))
        .collect();
    Ok((notes, migrated))
}

fn decode_translations(key: StorageKey, raw: &str) -> PortResult<(Vec<TranslationRecord>, bool)> {
    let stored: Vec<StoredTranslation> =
        serde_json::from_str(raw).map_err(|e| read_error(key, e))?;
    let total = stored.len();
    let migrated = stored.iter().any(StoredTranslation::is_legacy);
    let records: Vec<TranslationRecord> = stored
        .into_iter()
        .filter_map(StoredTranslation::into_record)
        .collect();
    let dropped = total - records.len();
    if dropped > 0 {
        warn!(%key, dropped, "Skipped legacy entries with no translation");
    }
    Ok((records, migrated || dropped > 0))
}

fn read_error(key: StorageKey, e: impl std::fmt::Display) -> PortError {
    PortError::StorageRead {
        key: key.to_string(),
        reason: e.to_string(),
    }
}

//=========================================================================================
// Save-on-change
//=========================================================================================

/// Serializes the full value of every key touched since the last save and
/// writes it. There is no retry: a failed key is written again the next time
/// an action touches it.
pub async fn save_changes(store: &mut CollectionStore, kv: &dyn KeyValueStore) -> SaveReport {
    let mut report = SaveReport::default();

    for key in store.take_changes() {
        let outcome = match encode(store, key) {
            Ok(value) => kv.set(key.as_str(), &value).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(()) => report.written.push(key),
            Err(e) => {
                error!(%key, "Failed to persist collection: {}", e);
                report.failed.push((key, e));
            }
        }
    }

    report
}

/// The serialized form of the value stored under `key`.
pub fn encode(store: &CollectionStore, key: StorageKey) -> PortResult<String> {
    let encoded = match key {
        StorageKey::StoredNotes => serde_json::to_string(store.notes()),
        StorageKey::DeletedNotes => serde_json::to_string(store.deleted()),
        StorageKey::Date => serde_json::to_string(&store.date().to_rfc2822()),
        StorageKey::History => serde_json::to_string(store.history()),
        StorageKey::SavedItems => serde_json::to_string(store.saved()),
    };
    encoded.map_err(|e| PortError::StorageWrite {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
