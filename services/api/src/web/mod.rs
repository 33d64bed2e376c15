pub mod rest;
pub mod state;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use state::AppState;

// Re-export the handlers so the binary and tests can reach them directly.
pub use rest::{
    create_note_handler, delete_note_handler, edit_note_handler, get_languages_handler,
    health_handler, list_deleted_handler, list_history_handler, list_notes_handler,
    list_saved_handler, restore_note_handler, save_item_handler, set_draft_handler,
    set_languages_handler, translate_handler, unsave_item_handler,
};

/// Builds the JSON API router. CORS and the Swagger UI are layered on by the binary.
pub fn api_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/translations", post(translate_handler))
        .route("/history", get(list_history_handler))
        .route("/saved", get(list_saved_handler))
        .route(
            "/saved/{id}",
            post(save_item_handler).delete(unsave_item_handler),
        )
        .route("/notes", get(list_notes_handler).post(create_note_handler))
        .route("/notes/{id}", put(edit_note_handler))
        .route("/notes/{id}/delete", post(delete_note_handler))
        .route("/deleted", get(list_deleted_handler))
        .route("/deleted/{id}/restore", post(restore_note_handler))
        .route("/draft", put(set_draft_handler))
        .route(
            "/languages",
            get(get_languages_handler).put(set_languages_handler),
        )
        .with_state(app_state)
}
