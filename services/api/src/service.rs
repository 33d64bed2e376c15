//! services/api/src/service.rs
//!
//! `NotesService` owns the `CollectionStore` and applies every user action to
//! it, writing the touched collections back through the `KeyValueStore` port
//! before the action returns.

use lingo_notes_core::languages::{self, LanguagePair};
use lingo_notes_core::ports::{KeyValueStore, PortError, PortResult, TranslationService};
use lingo_notes_core::sync::{self, LoadReport, SaveReport};
use lingo_notes_core::{CollectionStore, NoteEntry, TranslationRecord};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

/// Shown when the user submits nothing to translate or to note down.
pub const EMPTY_TEXT_PROMPT: &str = "Please type something!";

/// The value produced by an action, plus the outcome of persisting it.
#[derive(Debug)]
pub struct Mutation<T> {
    pub value: T,
    pub save: SaveReport,
}

pub struct NotesService {
    store: Mutex<CollectionStore>,
    kv: Arc<dyn KeyValueStore>,
    translator: Arc<dyn TranslationService>,
    revisions: watch::Sender<u64>,
}

impl NotesService {
    /// Builds the service and loads every persisted collection into memory.
    pub async fn start(
        kv: Arc<dyn KeyValueStore>,
        translator: Arc<dyn TranslationService>,
        languages: LanguagePair,
    ) -> (Self, LoadReport) {
        let mut store = CollectionStore::new(languages);
        let report = sync::load_on_start(&mut store, kv.as_ref()).await;
        let (revisions, _) = watch::channel(store.revision());

        let service = Self {
            store: Mutex::new(store),
            kv,
            translator,
            revisions,
        };
        (service, report)
    }

    /// Observers are notified with the store revision after every action.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revisions.subscribe()
    }

    /// Runs `f` against the current state.
    pub async fn read<R>(&self, f: impl FnOnce(&CollectionStore) -> R) -> R {
        let store = self.store.lock().await;
        f(&*store)
    }

    async fn apply<T>(&self, action: impl FnOnce(&mut CollectionStore) -> T) -> Mutation<T> {
        let mut store = self.store.lock().await;
        let value = action(&mut *store);
        let save = sync::save_changes(&mut store, self.kv.as_ref()).await;
        let revision = store.revision();
        // Observers only wake when the action actually changed something.
        self.revisions.send_if_modified(|current| {
            let changed = *current != revision;
            *current = revision;
            changed
        });
        Mutation { value, save }
    }

    //=====================================================================================
    // Translation
    //=====================================================================================

    /// Translates `text` and appends the result to history. `from` and `to`
    /// default to the selected language pair. Blank text is rejected, but the
    /// text is otherwise sent and recorded as entered.
    ///
    /// The network call runs without holding the store, so other actions are
    /// not blocked behind it. On failure history is left untouched.
    pub async fn translate_and_record(
        &self,
        text: &str,
        from: Option<&str>,
        to: Option<&str>,
    ) -> PortResult<Mutation<TranslationRecord>> {
        if text.trim().is_empty() {
            return Err(PortError::Validation(EMPTY_TEXT_PROMPT.to_string()));
        }

        let selected = self.read(|s| s.languages().clone()).await;
        let from = from.unwrap_or(selected.language_from.as_str());
        let to = to.unwrap_or(selected.language_to.as_str());
        languages::ensure_supported(from)?;
        languages::ensure_supported(to)?;

        let result = self
            .translator
            .translate(text, from, to)
            .await
            .inspect_err(|e| warn!(from, to, "Translation failed: {}", e))?;

        let record = TranslationRecord::from_result(result);
        let mutation = self
            .apply(|store| {
                let id = store.add_history_item(record.clone());
                TranslationRecord { id, ..record }
            })
            .await;
        info!(id = %mutation.value.id, from, to, "Translation added to history");
        Ok(mutation)
    }

    //=====================================================================================
    // Saved Items
    //=====================================================================================

    /// Saves the history record `id`. Saving an already-saved record is a no-op.
    pub async fn save_item(&self, id: Uuid) -> PortResult<Mutation<bool>> {
        let mutation = self
            .apply(|store| {
                let record = store.find_history(id).cloned()?;
                Some(store.add_saved_item(record))
            })
            .await;
        match mutation.value {
            Some(added) => Ok(Mutation {
                value: added,
                save: mutation.save,
            }),
            None => Err(PortError::NotFound(format!("History item {}", id))),
        }
    }

    /// Removes `id` from the saved items. Yields `false` when it was not saved.
    pub async fn unsave_item(&self, id: Uuid) -> Mutation<bool> {
        self.apply(|store| store.remove_saved_item(id)).await
    }

    /// Yields the new saved state, or `None` for an unknown history id.
    pub async fn toggle_saved(&self, id: Uuid) -> Mutation<Option<bool>> {
        self.apply(|store| store.toggle_saved(id)).await
    }

    //=====================================================================================
    // Notes
    //=====================================================================================

    /// Adds a note with `text`, or with the current draft when `text` is blank.
    pub async fn add_note(&self, text: Option<&str>) -> PortResult<Mutation<NoteEntry>> {
        let mutation = self
            .apply(|store| {
                let text = text
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| store.note_draft().trim().to_string());
                (!text.is_empty()).then(|| store.add_note(text))
            })
            .await;
        match mutation.value {
            Some(entry) => Ok(Mutation {
                value: entry,
                save: mutation.save,
            }),
            None => Err(PortError::Validation(EMPTY_TEXT_PROMPT.to_string())),
        }
    }

    /// Replaces note `id` with a new note holding `text`.
    pub async fn edit_note(&self, id: Uuid, text: &str) -> PortResult<Mutation<NoteEntry>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PortError::Validation(EMPTY_TEXT_PROMPT.to_string()));
        }
        let mutation = self.apply(|store| store.edit_note(id, text)).await;
        match mutation.value {
            Some(entry) => Ok(Mutation {
                value: entry,
                save: mutation.save,
            }),
            None => Err(PortError::NotFound(format!("Note {}", id))),
        }
    }

    pub async fn set_note_draft(&self, text: &str) -> Mutation<()> {
        self.apply(|store| store.set_note_draft(text)).await
    }

    /// Moves a note to the deleted bin. Yields `false` when it was not active.
    pub async fn move_note_to_deleted(&self, id: Uuid) -> Mutation<bool> {
        self.apply(|store| store.move_note_to_deleted(id)).await
    }

    /// Restores a note from the deleted bin. Yields `false` when it was not there.
    pub async fn restore_from_deleted(&self, id: Uuid) -> Mutation<bool> {
        self.apply(|store| store.restore_from_deleted(id)).await
    }

    //=====================================================================================
    // Languages
    //=====================================================================================

    pub async fn set_languages(&self, from: &str, to: &str) -> PortResult<Mutation<LanguagePair>> {
        let pair = LanguagePair::new(from, to)?;
        Ok(self
            .apply(|store| {
                store.set_languages(pair.clone());
                pair
            })
            .await)
    }
}
