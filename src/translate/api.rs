//! Translation capability abstraction.

use async_trait::async_trait;

/// A successful response from a translation capability.
#[derive(Debug, Clone)]
pub struct ApiTranslation {
    /// Translated text in the requested target language.
    pub text: String,
    /// Detected source language code, when the service reports one.
    pub detected_source: Option<String>,
}

/// Errors that can occur during translation.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// Failed to reach the translation service.
    #[error("connection error: {0}")]
    Connection(String),
    /// The service returned an error.
    #[error("API error: {0}")]
    Api(String),
    /// The response could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

/// A black-box translation capability: text and target language in,
/// translated text and detected source language out.
#[async_trait]
pub trait TranslationApi: Send + Sync {
    /// Translate `text` into `dest`, detecting the source language.
    async fn translate(&self, text: &str, dest: &str) -> Result<ApiTranslation, TranslateError>;
}
