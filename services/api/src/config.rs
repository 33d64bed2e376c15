//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use lingo_notes_core::languages::{DEFAULT_LANGUAGE_FROM, DEFAULT_LANGUAGE_TO};
use lingo_notes_core::LanguagePair;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

pub const DEFAULT_TRANSLATE_API_URL: &str = "https://nlp-translation.p.rapidapi.com/v1/translate";
pub const DEFAULT_RAPIDAPI_HOST: &str = "nlp-translation.p.rapidapi.com";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Where collections are persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// One JSON file per key under `data_dir`.
    File,
    /// Process memory only; everything is lost on exit.
    Memory,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub allowed_origin: String,
    pub storage_backend: StorageBackend,
    pub data_dir: PathBuf,
    pub log_level: Level,
    pub translate_api_url: String,
    pub rapidapi_key: Option<String>,
    pub rapidapi_host: String,
    pub default_languages: LanguagePair,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        // --- Load Server Settings ---
        let bind_address_str = var_or("BIND_ADDRESS", "0.0.0.0:3000");
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;
        let allowed_origin = var_or("ALLOWED_ORIGIN", "http://localhost:8081");

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Storage Settings ---
        let storage_backend = match var_or("STORAGE_BACKEND", "file").to_lowercase().as_str() {
            "file" => StorageBackend::File,
            "memory" => StorageBackend::Memory,
            other => {
                return Err(ConfigError::InvalidValue(
                    "STORAGE_BACKEND".to_string(),
                    format!("'{}' is not one of 'file' or 'memory'", other),
                ))
            }
        };
        let data_dir = lookup("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"));

        // --- Load Translation API Settings ---
        let translate_api_url = var_or("TRANSLATE_API_URL", DEFAULT_TRANSLATE_API_URL);
        let rapidapi_key = lookup("RAPIDAPI_KEY").filter(|key| !key.trim().is_empty());
        let rapidapi_host = var_or("RAPIDAPI_HOST", DEFAULT_RAPIDAPI_HOST);

        let language_from = var_or("DEFAULT_LANGUAGE_FROM", DEFAULT_LANGUAGE_FROM);
        let language_to = var_or("DEFAULT_LANGUAGE_TO", DEFAULT_LANGUAGE_TO);
        let default_languages = LanguagePair::new(language_from.clone(), language_to.clone())
            .map_err(|e| {
                ConfigError::InvalidValue(
                    "DEFAULT_LANGUAGE_FROM/DEFAULT_LANGUAGE_TO".to_string(),
                    format!("'{}' -> '{}': {}", language_from, language_to, e),
                )
            })?;

        Ok(Self {
            bind_address,
            allowed_origin,
            storage_backend,
            data_dir,
            log_level,
            translate_api_url,
            rapidapi_key,
            rapidapi_host,
            default_languages,
        })
    }
}
