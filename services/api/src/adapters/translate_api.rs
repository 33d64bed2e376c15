//! services/api/src/adapters/translate_api.rs
//!
//! This module contains the adapter for the remote translation API.
//! It implements the `TranslationService` port from the `core` crate.

use async_trait::async_trait;
use lingo_notes_core::domain::TranslationResult;
use lingo_notes_core::ports::{PortError, PortResult, TranslationService};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// The only part of the response body we rely on.
#[derive(Debug, Deserialize)]
struct TranslateResponseBody {
    translated_text: HashMap<String, String>,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TranslationService` against an HTTP endpoint
/// taking `text`, `from` and `to` as query parameters.
#[derive(Clone)]
pub struct HttpTranslationAdapter {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    api_host: Option<String>,
}

impl HttpTranslationAdapter {
    /// Creates a new `HttpTranslationAdapter` with no API credentials.
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: None,
            api_host: None,
        }
    }

    /// Sends the `X-RapidAPI-Key` and `X-RapidAPI-Host` headers with every request.
    pub fn with_rapidapi_credentials(mut self, api_key: String, api_host: String) -> Self {
        self.api_key = Some(api_key);
        self.api_host = Some(api_host);
        self
    }
}

//=========================================================================================
// `TranslationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TranslationService for HttpTranslationAdapter {
    async fn translate(&self, text: &str, from: &str, to: &str) -> PortResult<TranslationResult> {
        debug!(endpoint = %self.endpoint, from, to, "Requesting translation");

        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("text", text), ("to", to), ("from", from)]);
        if let Some(api_key) = &self.api_key {
            request = request.header("X-RapidAPI-Key", api_key);
        }
        if let Some(api_host) = &self.api_host {
            request = request.header("X-RapidAPI-Host", api_host);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(PortError::UnexpectedStatus(status.as_u16()));
        }

        let body = response
            .json::<TranslateResponseBody>()
            .await
            .map_err(|e| PortError::MalformedResponse(e.to_string()))?;

        let translated_text = body.translated_text.get(to).cloned().ok_or_else(|| {
            PortError::MalformedResponse(format!("No translation for '{}' in response", to))
        })?;

        Ok(TranslationResult {
            text: text.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            translated_text,
        })
    }
}
