pub mod domain;
pub mod languages;
pub mod ports;
pub mod store;
pub mod sync;

pub use domain::{format_timestamp, NoteEntry, TranslationRecord, TranslationResult};
pub use languages::LanguagePair;
pub use ports::{KeyValueStore, PortError, PortResult, StorageKey, TranslationService};
pub use store::CollectionStore;
pub use sync::{load_on_start, save_changes, LoadReport, SaveReport};
