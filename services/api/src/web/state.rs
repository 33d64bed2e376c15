//! services/api/src/web/state.rs
//!
//! Defines the application state shared by every handler.

use crate::service::NotesService;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<NotesService>,
}

impl AppState {
    pub fn new(notes: NotesService) -> Self {
        Self {
            notes: Arc::new(notes),
        }
    }
}
