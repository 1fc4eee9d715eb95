//! Translation adapter.
//!
//! Wraps a translation capability and normalizes success and failure into a
//! uniform [`TranslationResult`]: callers always receive a translated field,
//! degraded to the original text when the capability fails or the input is
//! too short to be worth a network round trip.

mod api;
mod google;

pub use api::{ApiTranslation, TranslateError, TranslationApi};
pub use google::{GoogleTranslateClient, DEFAULT_ENDPOINT};

use std::sync::Arc;

use crate::models::TranslationResult;

/// Minimum trimmed length worth sending to the translation service.
const MIN_TRANSLATABLE_CHARS: usize = 2;

/// Service name reported on successful translations.
const SERVICE_NAME: &str = "Google Translate";

/// Translation adapter over an injected capability.
#[derive(Clone)]
pub struct Translator {
    api: Arc<dyn TranslationApi>,
    default_target: String,
}

impl Translator {
    /// Create a translator with a default target language code.
    pub fn new(api: Arc<dyn TranslationApi>, default_target: impl Into<String>) -> Self {
        Self {
            api,
            default_target: default_target.into(),
        }
    }

    /// The target language used when none is specified.
    pub fn default_target(&self) -> &str {
        &self.default_target
    }

    /// Translate into the default target language.
    pub async fn translate(&self, text: &str) -> TranslationResult {
        self.translate_to(text, &self.default_target).await
    }

    /// Translate into an explicit target language.
    pub async fn translate_to(&self, text: &str, target: &str) -> TranslationResult {
        let clean = text.trim();

        if clean.is_empty() {
            return TranslationResult::skipped(text, target, "Empty text provided");
        }
        if clean.chars().count() < MIN_TRANSLATABLE_CHARS {
            return TranslationResult::skipped(text, target, "Text too short to translate");
        }

        tracing::debug!(lang = target, chars = clean.chars().count(), "requesting translation");

        match self.api.translate(clean, target).await {
            Ok(api) => {
                tracing::debug!(
                    detected = api.detected_source.as_deref().unwrap_or("unknown"),
                    "translation succeeded"
                );
                TranslationResult {
                    translated_text: api.text,
                    original_text: text.to_string(),
                    detected_language: api.detected_source,
                    target_language: target.to_string(),
                    translation_success: true,
                    error: None,
                    translator_service: Some(SERVICE_NAME.to_string()),
                }
            }
            Err(e) => {
                tracing::warn!("translation failed: {}", e);
                TranslationResult::failed(text, target, e.to_string())
            }
        }
    }

    /// Cheap end-to-end check used by the self-test endpoint.
    pub async fn probe(&self) -> bool {
        self.api.translate("Hello", &self.default_target).await.is_ok()
    }
}
