//! crates/lingo_notes_core/src/domain.rs
//!
//! Defines the core data structures for the application.
//! The `Stored*` enums describe every shape a persisted entry has ever had, so
//! older values can be migrated into the current structs at load time.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A single completed translation, as kept in history and saved items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRecord {
    pub id: Uuid,
    pub source_text: String,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    pub created_at: DateTime<Utc>,
}

impl TranslationRecord {
    /// Builds a new record from a translation result, stamped with the current time.
    pub fn from_result(result: TranslationResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_text: result.text,
            translated_text: result.translated_text,
            source_language: result.from,
            target_language: result.to,
            created_at: Utc::now(),
        }
    }
}

/// The outcome of one call to the translation port, echoing the request parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub text: String,
    pub from: String,
    pub to: String,
    pub translated_text: String,
}

/// A free-text note, either active or sitting in the deleted bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteEntry {
    pub id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl NoteEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

//=========================================================================================
// Stored Shapes
//=========================================================================================

/// A note as found in storage: older versions wrote bare strings, and
/// occasionally `null` for a note that was never typed.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StoredNote {
    Entry(NoteEntry),
    Legacy(Option<String>),
}

impl StoredNote {
    pub fn is_legacy(&self) -> bool {
        matches!(self, StoredNote::Legacy(_))
    }

    /// Converts to the current shape, or `None` for a legacy `null`. Legacy
    /// notes carry no timestamp of their own, so they take `fallback_created_at`.
    pub fn into_entry(self, fallback_created_at: DateTime<Utc>) -> Option<NoteEntry> {
        match self {
            StoredNote::Entry(entry) => Some(entry),
            StoredNote::Legacy(text) => text.map(|text| NoteEntry {
                id: Uuid::new_v4(),
                text,
                created_at: fallback_created_at,
            }),
        }
    }
}

/// The raw translation API response that older versions appended to history,
/// with an `id` and `dateTime` bolted on.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyTranslation {
    pub id: Option<Uuid>,
    pub text: String,
    pub from: String,
    pub to: String,
    pub translated_text: HashMap<String, String>,
    #[serde(rename = "dateTime")]
    pub date_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StoredTranslation {
    Record(TranslationRecord),
    Legacy(LegacyTranslation),
}

impl StoredTranslation {
    pub fn is_legacy(&self) -> bool {
        matches!(self, StoredTranslation::Legacy(_))
    }

    /// Converts to a `TranslationRecord`. Returns `None` for a legacy entry whose
    /// `translated_text` has no value for its own target language.
    pub fn into_record(self) -> Option<TranslationRecord> {
        match self {
            StoredTranslation::Record(record) => Some(record),
            StoredTranslation::Legacy(mut legacy) => {
                let translated_text = legacy.translated_text.remove(&legacy.to)?;
                Some(TranslationRecord {
                    id: legacy.id.unwrap_or_else(Uuid::new_v4),
                    source_text: legacy.text,
                    translated_text,
                    source_language: legacy.from,
                    target_language: legacy.to,
                    created_at: legacy.date_time.unwrap_or_else(Utc::now),
                })
            }
        }
    }
}

//=========================================================================================
// Display Helpers
//=========================================================================================

/// Renders a timestamp as `D/M/YYYY - H:MM:SS` for list views.
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    format!(
        "{}/{}/{} - {}:{:02}:{:02}",
        at.day(),
        at.month(),
        at.year(),
        at.hour(),
        at.minute(),
        at.second()
    )
}
