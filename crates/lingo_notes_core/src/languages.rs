//! crates/lingo_notes_core/src/languages.rs
//!
//! The fixed registry of languages the translation screen can offer.

use crate::ports::{PortError, PortResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LANGUAGE_FROM: &str = "en";
pub const DEFAULT_LANGUAGE_TO: &str = "ko";

/// Language code to display name, sorted by code.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("ar", "Arabic"),
    ("bg", "Bulgarian"),
    ("bn", "Bengali"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("ms", "Malay"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("th", "Thai"),
    ("tl", "Tagalog"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese"),
];

pub fn display_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .binary_search_by(|(candidate, _)| (*candidate).cmp(code))
        .ok()
        .map(|index| SUPPORTED_LANGUAGES[index].1)
}

pub fn is_supported(code: &str) -> bool {
    display_name(code).is_some()
}

/// Fails with a validation error for codes outside the registry.
pub fn ensure_supported(code: &str) -> PortResult<()> {
    if is_supported(code) {
        Ok(())
    } else {
        Err(PortError::Validation(format!(
            "Unsupported language code '{}'",
            code
        )))
    }
}

/// The currently selected source and target languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagePair {
    pub language_from: String,
    pub language_to: String,
}

impl LanguagePair {
    /// Builds a pair after checking both codes against the registry.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> PortResult<Self> {
        let (language_from, language_to) = (from.into(), to.into());
        ensure_supported(&language_from)?;
        ensure_supported(&language_to)?;
        Ok(Self {
            language_from,
            language_to,
        })
    }
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self {
            language_from: DEFAULT_LANGUAGE_FROM.to_string(),
            language_to: DEFAULT_LANGUAGE_TO.to_string(),
        }
    }
}
