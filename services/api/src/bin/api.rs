//! services/api/src/bin/api.rs

use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::Router;
use lingo_notes_core::ports::{KeyValueStore, TranslationService};
use notes_api_lib::{
    adapters::{FileKeyValueStore, HttpTranslationAdapter, MemoryKeyValueStore},
    config::{Config, StorageBackend},
    error::ApiError,
    service::NotesService,
    web::{api_router, rest::ApiDoc, state::AppState},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open Storage ---
    let kv: Arc<dyn KeyValueStore> = match config.storage_backend {
        StorageBackend::File => {
            info!("Using file storage at {}", config.data_dir.display());
            Arc::new(FileKeyValueStore::open(&config.data_dir).await?)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; nothing will survive a restart");
            Arc::new(MemoryKeyValueStore::new())
        }
    };

    // --- 3. Initialize the Translation Adapter ---
    let http_client = reqwest::Client::builder().build()?;
    let mut translate_adapter =
        HttpTranslationAdapter::new(http_client, config.translate_api_url.clone());
    match &config.rapidapi_key {
        Some(api_key) => {
            translate_adapter = translate_adapter
                .with_rapidapi_credentials(api_key.clone(), config.rapidapi_host.clone());
        }
        None => warn!("RAPIDAPI_KEY is not set; translation requests will be unauthenticated"),
    }
    let translator: Arc<dyn TranslationService> = Arc::new(translate_adapter);

    // --- 4. Load Collections & Build the Shared AppState ---
    let (notes, report) =
        NotesService::start(kv, translator, config.default_languages.clone()).await;
    if !report.malformed.is_empty() {
        warn!(keys = ?report.malformed, "Some stored collections could not be read and start empty");
    }
    let app_state = Arc::new(AppState::new(notes));

    let origin = config.allowed_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!(
            "Invalid ALLOWED_ORIGIN '{}': {}",
            config.allowed_origin, e
        ))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let app = Router::new()
        .merge(api_router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
