use lingo_notes_core::ports::{KeyValueStore, PortError};
use lingo_notes_core::{load_on_start, save_changes, CollectionStore, TranslationRecord, TranslationResult};
use notes_api_lib::adapters::FileKeyValueStore;
use tempfile::tempdir;

#[tokio::test]
async fn missing_keys_read_as_absent() {
    let dir = tempdir().unwrap();
    let store = FileKeyValueStore::open(dir.path()).await.unwrap();

    assert_eq!(store.get("history").await.unwrap(), None);
}

#[tokio::test]
async fn values_survive_reopening() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("nested").join("data");

    let store = FileKeyValueStore::open(&root).await.unwrap();
    store.set("savedItems", "[]").await.unwrap();
    store.set("savedItems", "[1]").await.unwrap();
    drop(store);

    let reopened = FileKeyValueStore::open(&root).await.unwrap();
    assert_eq!(reopened.get("savedItems").await.unwrap().as_deref(), Some("[1]"));
}

#[tokio::test]
async fn writes_leave_no_temp_files_behind() {
    let dir = tempdir().unwrap();
    let store = FileKeyValueStore::open(dir.path()).await.unwrap();
    store.set("date", "\"now\"").await.unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["date.json".to_string()]);
}

#[tokio::test]
async fn rejects_keys_that_escape_the_data_dir() {
    let dir = tempdir().unwrap();
    let store = FileKeyValueStore::open(dir.path()).await.unwrap();

    assert!(matches!(
        store.set("../outside", "x").await,
        Err(PortError::StorageWrite { .. })
    ));
    assert!(matches!(
        store.get("a/b").await,
        Err(PortError::StorageRead { .. })
    ));
}

#[tokio::test]
async fn collections_round_trip_through_files() {
    let dir = tempdir().unwrap();
    let kv = FileKeyValueStore::open(dir.path()).await.unwrap();

    let mut original = CollectionStore::default();
    let id = original.add_history_item(TranslationRecord::from_result(TranslationResult {
        text: "good morning".to_string(),
        from: "en".to_string(),
        to: "ja".to_string(),
        translated_text: "おはよう".to_string(),
    }));
    original.toggle_saved(id);
    let note = original.add_note("remember the milk");
    original.move_note_to_deleted(note.id);
    assert!(save_changes(&mut original, &kv).await.is_clean());

    let mut reloaded = CollectionStore::default();
    let report = load_on_start(&mut reloaded, &kv).await;

    assert!(report.malformed.is_empty());
    assert_eq!(reloaded.history(), original.history());
    assert_eq!(reloaded.saved(), original.saved());
    assert!(reloaded.notes().is_empty());
    assert_eq!(reloaded.deleted(), original.deleted());
    assert_eq!(reloaded.date().timestamp(), original.date().timestamp());
}
