//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use lingo_notes_core::domain::TranslationResult;
use lingo_notes_core::ports::{KeyValueStore, PortError, PortResult, TranslationService};
use lingo_notes_core::LanguagePair;
use notes_api_lib::adapters::MemoryKeyValueStore;
use notes_api_lib::service::NotesService;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// How `StubTranslator` answers every call.
#[derive(Clone)]
pub enum StubReply {
    Text(String),
    Status(u16),
}

pub struct StubTranslator {
    reply: StubReply,
    calls: AtomicUsize,
}

impl StubTranslator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: StubReply::Text(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: StubReply::Status(status),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationService for StubTranslator {
    async fn translate(&self, text: &str, from: &str, to: &str) -> PortResult<TranslationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            StubReply::Text(translated) => Ok(TranslationResult {
                text: text.to_string(),
                from: from.to_string(),
                to: to.to_string(),
                translated_text: translated.clone(),
            }),
            StubReply::Status(status) => Err(PortError::UnexpectedStatus(*status)),
        }
    }
}

/// An in-memory store whose writes can be switched off.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryKeyValueStore,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PortError::StorageWrite {
                key: key.to_string(),
                reason: "storage unavailable".to_string(),
            });
        }
        self.inner.set(key, value).await
    }
}

pub async fn start_service(
    kv: Arc<dyn KeyValueStore>,
    translator: Arc<dyn TranslationService>,
) -> NotesService {
    let (service, _) = NotesService::start(kv, translator, LanguagePair::default()).await;
    service
}
