//! crates/lingo_notes_core/src/store.rs
//!
//! The in-memory mirror of every persisted collection. Its methods are the only
//! writers to the collections; each one records which storage keys it touched
//! so the synchronization layer knows what to write back.

use crate::domain::{NoteEntry, TranslationRecord};
use crate::languages::LanguagePair;
use crate::ports::StorageKey;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CollectionStore {
    history: Vec<TranslationRecord>,
    saved: Vec<TranslationRecord>,
    notes: Vec<NoteEntry>,
    deleted: Vec<NoteEntry>,
    note_draft: String,
    date: DateTime<Utc>,
    languages: LanguagePair,
    dirty: BTreeSet<StorageKey>,
    revision: u64,
}

impl Default for CollectionStore {
    fn default() -> Self {
        Self::new(LanguagePair::default())
    }
}

impl CollectionStore {
    /// Creates an empty store with the given language selection.
    pub fn new(languages: LanguagePair) -> Self {
        Self {
            history: Vec::new(),
            saved: Vec::new(),
            notes: Vec::new(),
            deleted: Vec::new(),
            note_draft: String::new(),
            date: Utc::now(),
            languages,
            dirty: BTreeSet::new(),
            revision: 0,
        }
    }

    // --- Readers ---

    /// History in storage (insertion) order.
    pub fn history(&self) -> &[TranslationRecord] {
        &self.history
    }

    /// History as it is displayed: most recent translation first.
    pub fn history_newest_first(&self) -> impl Iterator<Item = &TranslationRecord> {
        self.history.iter().rev()
    }

    pub fn find_history(&self, id: Uuid) -> Option<&TranslationRecord> {
        self.history.iter().find(|r| r.id == id)
    }

    pub fn saved(&self) -> &[TranslationRecord] {
        &self.saved
    }

    pub fn is_saved(&self, id: Uuid) -> bool {
        self.saved.iter().any(|r| r.id == id)
    }

    /// Active notes, newest first.
    pub fn notes(&self) -> &[NoteEntry] {
        &self.notes
    }

    pub fn find_note(&self, id: Uuid) -> Option<&NoteEntry> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn deleted(&self) -> &[NoteEntry] {
        &self.deleted
    }

    pub fn note_draft(&self) -> &str {
        &self.note_draft
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn languages(&self) -> &LanguagePair {
        &self.languages
    }

    /// Incremented by every applied action; observers compare it to spot changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Keys changed since the last call, clearing the set.
    pub fn take_changes(&mut self) -> BTreeSet<StorageKey> {
        std::mem::take(&mut self.dirty)
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub(crate) fn mark_dirty(&mut self, key: StorageKey) {
        self.dirty.insert(key);
    }

    fn touched(&mut self, keys: &[StorageKey]) {
        self.dirty.extend(keys.iter().copied());
        self.revision += 1;
    }

    // --- Bulk replacement (load time) ---

    /// Overwrites history. Later duplicates of an id are dropped; returns
    /// `true` when any were, so the caller can write the cleaned list back.
    pub fn replace_history(&mut self, items: Vec<TranslationRecord>) -> bool {
        let (items, deduped) = dedupe_by_id(items, |r| r.id);
        self.history = items;
        self.touched(&[StorageKey::History]);
        deduped
    }

    pub fn replace_saved(&mut self, items: Vec<TranslationRecord>) -> bool {
        let (items, deduped) = dedupe_by_id(items, |r| r.id);
        self.saved = items;
        self.touched(&[StorageKey::SavedItems]);
        deduped
    }

    pub fn replace_notes(&mut self, items: Vec<NoteEntry>) -> bool {
        let (items, deduped) = dedupe_by_id(items, |n| n.id);
        self.notes = items;
        self.touched(&[StorageKey::StoredNotes]);
        deduped
    }

    pub fn replace_deleted(&mut self, items: Vec<NoteEntry>) -> bool {
        let (items, deduped) = dedupe_by_id(items, |n| n.id);
        self.deleted = items;
        self.touched(&[StorageKey::DeletedNotes]);
        deduped
    }

    pub fn set_date(&mut self, date: DateTime<Utc>) {
        self.date = date;
        self.touched(&[StorageKey::Date]);
    }

    // --- History and saved items ---

    /// Appends a record to history and returns the id it was stored under.
    /// A nil or already-used id is replaced with a fresh one.
    pub fn add_history_item(&mut self, mut item: TranslationRecord) -> Uuid {
        if item.id.is_nil() || self.find_history(item.id).is_some() {
            item.id = self.fresh_history_id();
        }
        let id = item.id;
        self.history.push(item);
        self.touched(&[StorageKey::History]);
        id
    }

    fn fresh_history_id(&self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            if self.find_history(id).is_none() {
                return id;
            }
        }
    }

    /// Returns `false` when the item was already saved.
    pub fn add_saved_item(&mut self, item: TranslationRecord) -> bool {
        if self.is_saved(item.id) {
            return false;
        }
        self.saved.push(item);
        self.touched(&[StorageKey::SavedItems]);
        true
    }

    /// Returns `false` when `id` was not saved.
    pub fn remove_saved_item(&mut self, id: Uuid) -> bool {
        let Some(index) = self.saved.iter().position(|r| r.id == id) else {
            return false;
        };
        self.saved.remove(index);
        self.touched(&[StorageKey::SavedItems]);
        true
    }

    /// Saves or unsaves the history record `id`. Yields the new saved state,
    /// or `None` when history has no such record.
    pub fn toggle_saved(&mut self, id: Uuid) -> Option<bool> {
        if self.remove_saved_item(id) {
            return Some(false);
        }
        let record = self.find_history(id)?.clone();
        Some(self.add_saved_item(record))
    }

    // --- Notes ---

    /// Puts a new note at the top of the list, clears the draft, and stamps the
    /// last-write date.
    pub fn add_note(&mut self, text: impl Into<String>) -> NoteEntry {
        let entry = NoteEntry::new(text);
        self.notes.insert(0, entry.clone());
        self.note_draft.clear();
        self.date = entry.created_at;
        self.touched(&[StorageKey::StoredNotes, StorageKey::Date]);
        entry
    }

    /// Replaces note `id` with a new entry holding `text`, in the same position.
    pub fn edit_note(&mut self, id: Uuid, text: impl Into<String>) -> Option<NoteEntry> {
        let index = self.notes.iter().position(|n| n.id == id)?;
        let entry = NoteEntry::new(text);
        self.notes[index] = entry.clone();
        self.date = entry.created_at;
        self.touched(&[StorageKey::StoredNotes, StorageKey::Date]);
        Some(entry)
    }

    /// Moves note `id` into the deleted bin. Returns `false` if it is not active.
    pub fn move_note_to_deleted(&mut self, id: Uuid) -> bool {
        let Some(index) = self.notes.iter().position(|n| n.id == id) else {
            return false;
        };
        let entry = self.notes[index].clone();
        if !self.deleted.iter().any(|n| n.id == id) {
            self.deleted.push(entry);
        }
        self.notes.remove(index);
        self.touched(&[StorageKey::StoredNotes, StorageKey::DeletedNotes]);
        true
    }

    /// Moves note `id` out of the deleted bin back to the top of the active list.
    /// Returns `false` if it is not in the bin.
    pub fn restore_from_deleted(&mut self, id: Uuid) -> bool {
        let Some(index) = self.deleted.iter().position(|n| n.id == id) else {
            return false;
        };
        let entry = self.deleted[index].clone();
        if self.find_note(id).is_none() {
            self.notes.insert(0, entry);
        }
        self.deleted.remove(index);
        self.touched(&[StorageKey::StoredNotes, StorageKey::DeletedNotes]);
        true
    }

    // --- Unpersisted scalars ---

    pub fn set_note_draft(&mut self, text: impl Into<String>) {
        self.note_draft = text.into();
        self.revision += 1;
    }

    pub fn set_languages(&mut self, languages: LanguagePair) {
        self.languages = languages;
        self.revision += 1;
    }
}

fn dedupe_by_id<T>(items: Vec<T>, id: impl Fn(&T) -> Uuid) -> (Vec<T>, bool) {
    let total = items.len();
    let mut seen = HashSet::with_capacity(total);
    let kept: Vec<T> = items.into_iter().filter(|item| seen.insert(id(item))).collect();
    let deduped = kept.len() < total;
    (kept, deduped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TranslationResult;

    fn record(text: &str) -> TranslationRecord {
        TranslationRecord::from_result(TranslationResult {
            text: text.to_string(),
            from: "en".to_string(),
            to: "ko".to_string(),
            translated_text: format!("{text}-ko"),
        })
    }

    #[test]
    fn history_ids_stay_unique_across_adds() {
        let mut store = CollectionStore::default();
        let first = record("one");
        let mut nil = record("two");
        nil.id = Uuid::nil();

        store.add_history_item(first.clone());
        store.add_history_item(first.clone());
        store.add_history_item(nil.clone());
        store.add_history_item(nil);

        let ids: HashSet<Uuid> = store.history().iter().map(|r| r.id).collect();
        assert_eq!(store.history().len(), 4);
        assert_eq!(ids.len(), 4);
        assert!(!ids.contains(&Uuid::nil()));
        assert_eq!(store.history()[0].id, first.id);
    }

    #[test]
    fn history_is_displayed_newest_first() {
        let mut store = CollectionStore::default();
        store.add_history_item(record("old"));
        store.add_history_item(record("new"));

        let shown: Vec<&str> = store
            .history_newest_first()
            .map(|r| r.source_text.as_str())
            .collect();
        assert_eq!(shown, ["new", "old"]);
    }

    #[test]
    fn replace_history_drops_duplicate_ids() {
        let mut store = CollectionStore::default();
        let a = record("a");
        let mut a_again = record("a again");
        a_again.id = a.id;

        assert!(store.replace_history(vec![a.clone(), a_again, record("b")]));

        assert_eq!(store.history().len(), 2);
        assert_eq!(store.history()[0], a);
        assert!(!store.replace_history(vec![a.clone()]));
    }

    #[test]
    fn removing_a_saved_item_twice_is_a_no_op() {
        let mut store = CollectionStore::default();
        let item = record("keep");
        store.add_saved_item(item.clone());
        store.add_saved_item(record("other"));
        store.take_changes();

        assert!(store.remove_saved_item(item.id));
        let after_first = store.saved().to_vec();
        let revision = store.revision();
        store.take_changes();

        assert!(!store.remove_saved_item(item.id));
        assert_eq!(store.saved(), after_first.as_slice());
        assert_eq!(store.revision(), revision);
        assert!(!store.has_pending_changes());
    }

    #[test]
    fn saving_twice_keeps_one_copy() {
        let mut store = CollectionStore::default();
        let item = record("once");
        assert!(store.add_saved_item(item.clone()));
        assert!(!store.add_saved_item(item));
        assert_eq!(store.saved().len(), 1);
    }

    #[test]
    fn toggle_saved_flips_membership_of_history_items() {
        let mut store = CollectionStore::default();
        let id = store.add_history_item(record("hello"));

        assert_eq!(store.toggle_saved(id), Some(true));
        assert!(store.is_saved(id));
        assert_eq!(store.toggle_saved(id), Some(false));
        assert!(!store.is_saved(id));
        assert_eq!(store.toggle_saved(Uuid::new_v4()), None);
    }

    #[test]
    fn add_note_prepends_and_clears_draft() {
        let mut store = CollectionStore::default();
        store.set_note_draft("draft");
        store.add_note("first");
        let second = store.add_note("second");

        assert_eq!(store.notes()[0], second);
        assert_eq!(store.notes()[1].text, "first");
        assert_eq!(store.note_draft(), "");
        assert_eq!(store.date(), second.created_at);

        let changes = store.take_changes();
        assert!(changes.contains(&StorageKey::StoredNotes));
        assert!(changes.contains(&StorageKey::Date));
    }

    #[test]
    fn edit_note_replaces_entry_in_place_with_new_identity() {
        let mut store = CollectionStore::default();
        store.add_note("bottom");
        let top = store.add_note("top");

        let edited = store.edit_note(top.id, "top, edited").unwrap();

        assert_ne!(edited.id, top.id);
        assert_eq!(store.notes()[0], edited);
        assert_eq!(store.notes().len(), 2);
        assert!(store.edit_note(top.id, "gone").is_none());
    }

    #[test]
    fn delete_then_restore_round_trips_a_note() {
        let mut store = CollectionStore::default();
        let note = store.add_note("recover me");
        store.add_note("stays");

        assert!(store.move_note_to_deleted(note.id));
        assert!(store.find_note(note.id).is_none());
        assert_eq!(store.deleted(), &[note.clone()]);

        assert!(store.restore_from_deleted(note.id));
        assert!(store.deleted().is_empty());
        assert_eq!(store.notes().iter().filter(|n| n.id == note.id).count(), 1);
    }

    #[test]
    fn moving_absent_notes_is_a_no_op() {
        let mut store = CollectionStore::default();
        store.add_note("only");
        store.take_changes();
        let revision = store.revision();

        assert!(!store.move_note_to_deleted(Uuid::new_v4()));
        assert!(!store.restore_from_deleted(Uuid::new_v4()));
        assert_eq!(store.revision(), revision);
        assert!(!store.has_pending_changes());
    }

    #[test]
    fn restore_never_duplicates_an_active_note() {
        let mut store = CollectionStore::default();
        let note = store.add_note("twin");
        store.replace_deleted(vec![note.clone()]);

        assert!(store.restore_from_deleted(note.id));
        assert_eq!(store.notes().len(), 1);
        assert!(store.deleted().is_empty());
    }

    #[test]
    fn draft_and_language_changes_are_not_persisted() {
        let mut store = CollectionStore::default();
        store.set_note_draft("typing");
        store.set_languages(LanguagePair::new("fr", "de").unwrap());

        assert_eq!(store.revision(), 2);
        assert!(!store.has_pending_changes());
        assert_eq!(store.languages().language_to, "de");
    }
}
