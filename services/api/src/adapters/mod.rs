pub mod file_store;
pub mod memory_store;
pub mod translate_api;

pub use file_store::FileKeyValueStore;
pub use memory_store::MemoryKeyValueStore;
pub use translate_api::HttpTranslationAdapter;
