//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.
//!
//! Every failure is settled here. Translation errors become an empty result,
//! validation errors a 400 carrying the user-facing prompt, and unknown ids on
//! moves a `changed: false` answer.

use crate::service::Mutation;
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use lingo_notes_core::languages::SUPPORTED_LANGUAGES;
use lingo_notes_core::{format_timestamp, NoteEntry, PortError, TranslationRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        translate_handler,
        list_history_handler,
        list_saved_handler,
        save_item_handler,
        unsave_item_handler,
        list_notes_handler,
        create_note_handler,
        edit_note_handler,
        delete_note_handler,
        list_deleted_handler,
        restore_note_handler,
        set_draft_handler,
        get_languages_handler,
        set_languages_handler,
    ),
    components(
        schemas(
            TranslateRequest,
            TranslateResponse,
            RecordResponse,
            NoteRequest,
            NoteResponse,
            DraftRequest,
            ChangeResponse,
            LanguagesRequest,
            LanguagesResponse,
            LanguageOption,
        )
    ),
    tags(
        (name = "Lingo Notes API", description = "Translation history, saved items, and notes.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct TranslateRequest {
    pub text: String,
    /// Defaults to the selected source language.
    pub from: Option<String>,
    /// Defaults to the selected target language.
    pub to: Option<String>,
}

/// `translated_text` is empty and `record` absent when the translation failed.
#[derive(Serialize, ToSchema)]
pub struct TranslateResponse {
    pub translated_text: String,
    pub record: Option<RecordResponse>,
    pub persisted: bool,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub id: Uuid,
    pub source_text: String,
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
    pub created_at: DateTime<Utc>,
    pub display_date: String,
    pub saved: bool,
}

impl RecordResponse {
    fn new(record: &TranslationRecord, saved: bool) -> Self {
        Self {
            id: record.id,
            source_text: record.source_text.clone(),
            translated_text: record.translated_text.clone(),
            source_language: record.source_language.clone(),
            target_language: record.target_language.clone(),
            created_at: record.created_at,
            display_date: format_timestamp(&record.created_at),
            saved,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct NoteRequest {
    /// When blank the current draft is used.
    pub text: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub display_date: String,
}

impl From<&NoteEntry> for NoteResponse {
    fn from(entry: &NoteEntry) -> Self {
        Self {
            id: entry.id,
            text: entry.text.clone(),
            created_at: entry.created_at,
            display_date: format_timestamp(&entry.created_at),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct DraftRequest {
    pub text: String,
}

/// Answer to actions that may legitimately do nothing.
#[derive(Serialize, ToSchema)]
pub struct ChangeResponse {
    pub changed: bool,
    /// `false` when writing the change to storage failed; the change still applies.
    pub persisted: bool,
}

impl From<Mutation<bool>> for ChangeResponse {
    fn from(mutation: Mutation<bool>) -> Self {
        Self {
            changed: mutation.value,
            persisted: mutation.save.is_clean(),
        }
    }
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LanguagesRequest {
    pub language_from: String,
    pub language_to: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LanguagesResponse {
    pub language_from: String,
    pub language_to: String,
    pub supported: Vec<LanguageOption>,
}

#[derive(Serialize, ToSchema)]
pub struct LanguageOption {
    pub code: String,
    pub name: String,
}

fn port_error_response(context: &str, e: PortError) -> (StatusCode, String) {
    match e {
        PortError::Validation(message) => (StatusCode::BAD_REQUEST, message),
        PortError::NotFound(what) => (StatusCode::NOT_FOUND, format!("Item not found: {}", what)),
        other => {
            error!("{}: {:?}", context, other);
            (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Translate text and append the result to history.
#[utoipa::path(
    post,
    path = "/translations",
    request_body = TranslateRequest,
    responses(
        (status = 200, description = "Translation result, empty if the remote call failed", body = TranslateResponse),
        (status = 400, description = "Empty text or unsupported language")
    )
)]
pub async fn translate_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, (StatusCode, String)> {
    let outcome = app_state
        .notes
        .translate_and_record(&payload.text, payload.from.as_deref(), payload.to.as_deref())
        .await;

    match outcome {
        Ok(mutation) => Ok(Json(TranslateResponse {
            translated_text: mutation.value.translated_text.clone(),
            record: Some(RecordResponse::new(&mutation.value, false)),
            persisted: mutation.save.is_clean(),
        })),
        Err(PortError::Validation(message)) => Err((StatusCode::BAD_REQUEST, message)),
        Err(e) => {
            error!("Translation request failed: {}", e);
            Ok(Json(TranslateResponse {
                translated_text: String::new(),
                record: None,
                persisted: true,
            }))
        }
    }
}

/// List translation history, newest first.
#[utoipa::path(
    get,
    path = "/history",
    responses((status = 200, body = [RecordResponse]))
)]
pub async fn list_history_handler(
    State(app_state): State<Arc<AppState>>,
) -> Json<Vec<RecordResponse>> {
    let records: Vec<RecordResponse> = app_state
        .notes
        .read(|store| {
            store
                .history_newest_first()
                .map(|record| RecordResponse::new(record, store.is_saved(record.id)))
                .collect()
        })
        .await;
    Json(records)
}

#[utoipa::path(
    get,
    path = "/saved",
    responses((status = 200, body = [RecordResponse]))
)]
pub async fn list_saved_handler(State(app_state): State<Arc<AppState>>) -> Json<Vec<RecordResponse>> {
    let records: Vec<RecordResponse> = app_state
        .notes
        .read(|store| {
            store
                .saved()
                .iter()
                .map(|record| RecordResponse::new(record, true))
                .collect()
        })
        .await;
    Json(records)
}

/// Mark a history item as saved.
#[utoipa::path(
    post,
    path = "/saved/{id}",
    params(("id" = Uuid, Path, description = "History item id")),
    responses(
        (status = 200, body = ChangeResponse),
        (status = 404, description = "No history item with that id")
    )
)]
pub async fn save_item_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChangeResponse>, (StatusCode, String)> {
    app_state
        .notes
        .save_item(id)
        .await
        .map(|mutation| Json(mutation.into()))
        .map_err(|e| port_error_response("Failed to save item", e))
}

#[utoipa::path(
    delete,
    path = "/saved/{id}",
    params(("id" = Uuid, Path, description = "Saved item id")),
    responses((status = 200, body = ChangeResponse))
)]
pub async fn unsave_item_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Json<ChangeResponse> {
    Json(app_state.notes.unsave_item(id).await.into())
}

/// List active notes, newest first.
#[utoipa::path(
    get,
    path = "/notes",
    responses((status = 200, body = [NoteResponse]))
)]
pub async fn list_notes_handler(State(app_state): State<Arc<AppState>>) -> Json<Vec<NoteResponse>> {
    let notes: Vec<NoteResponse> = app_state
        .notes
        .read(|store| store.notes().iter().map(NoteResponse::from).collect())
        .await;
    Json(notes)
}

#[utoipa::path(
    post,
    path = "/notes",
    request_body = NoteRequest,
    responses(
        (status = 201, body = NoteResponse),
        (status = 400, description = "Both the text and the draft are empty")
    )
)]
pub async fn create_note_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<NoteRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mutation = app_state
        .notes
        .add_note(payload.text.as_deref())
        .await
        .map_err(|e| port_error_response("Failed to add note", e))?;
    Ok((StatusCode::CREATED, Json(NoteResponse::from(&mutation.value))))
}

/// Replace a note's text. The edited note gets a new id.
#[utoipa::path(
    put,
    path = "/notes/{id}",
    request_body = NoteRequest,
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 200, body = NoteResponse),
        (status = 400, description = "Empty text"),
        (status = 404, description = "No active note with that id")
    )
)]
pub async fn edit_note_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NoteRequest>,
) -> Result<Json<NoteResponse>, (StatusCode, String)> {
    let text = payload.text.unwrap_or_default();
    let mutation = app_state
        .notes
        .edit_note(id, &text)
        .await
        .map_err(|e| port_error_response("Failed to edit note", e))?;
    Ok(Json(NoteResponse::from(&mutation.value)))
}

/// Move a note to the deleted bin.
#[utoipa::path(
    post,
    path = "/notes/{id}/delete",
    params(("id" = Uuid, Path, description = "Note id")),
    responses((status = 200, body = ChangeResponse))
)]
pub async fn delete_note_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Json<ChangeResponse> {
    Json(app_state.notes.move_note_to_deleted(id).await.into())
}

#[utoipa::path(
    get,
    path = "/deleted",
    responses((status = 200, body = [NoteResponse]))
)]
pub async fn list_deleted_handler(
    State(app_state): State<Arc<AppState>>,
) -> Json<Vec<NoteResponse>> {
    let notes: Vec<NoteResponse> = app_state
        .notes
        .read(|store| store.deleted().iter().map(NoteResponse::from).collect())
        .await;
    Json(notes)
}

/// Move a note from the deleted bin back to the active list.
#[utoipa::path(
    post,
    path = "/deleted/{id}/restore",
    params(("id" = Uuid, Path, description = "Note id")),
    responses((status = 200, body = ChangeResponse))
)]
pub async fn restore_note_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Json<ChangeResponse> {
    Json(app_state.notes.restore_from_deleted(id).await.into())
}

#[utoipa::path(
    put,
    path = "/draft",
    request_body = DraftRequest,
    responses((status = 204, description = "Draft updated"))
)]
pub async fn set_draft_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<DraftRequest>,
) -> StatusCode {
    app_state.notes.set_note_draft(&payload.text).await;
    StatusCode::NO_CONTENT
}

/// The selected language pair and every supported language.
#[utoipa::path(
    get,
    path = "/languages",
    responses((status = 200, body = LanguagesResponse))
)]
pub async fn get_languages_handler(
    State(app_state): State<Arc<AppState>>,
) -> Json<LanguagesResponse> {
    let selected = app_state.notes.read(|store| store.languages().clone()).await;
    Json(languages_response(selected.language_from, selected.language_to))
}

#[utoipa::path(
    put,
    path = "/languages",
    request_body = LanguagesRequest,
    responses(
        (status = 200, body = LanguagesResponse),
        (status = 400, description = "Unsupported language code")
    )
)]
pub async fn set_languages_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<LanguagesRequest>,
) -> Result<Json<LanguagesResponse>, (StatusCode, String)> {
    let mutation = app_state
        .notes
        .set_languages(&payload.language_from, &payload.language_to)
        .await
        .map_err(|e| port_error_response("Failed to select languages", e))?;
    let pair = mutation.value;
    Ok(Json(languages_response(pair.language_from, pair.language_to)))
}

fn languages_response(language_from: String, language_to: String) -> LanguagesResponse {
    LanguagesResponse {
        language_from,
        language_to,
        supported: SUPPORTED_LANGUAGES
            .iter()
            .map(|(code, name)| LanguageOption {
                code: code.to_string(),
                name: name.to_string(),
            })
            .collect(),
    }
}
