//! Result types shared by the pipeline and the HTTP layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Prefix marking an extraction result that carries an error description
/// instead of recognized text.
pub const ERROR_MARKER: &str = "Error extracting text: ";

/// Aggregate outcome of running every OCR strategy against one image.
///
/// Always well-formed: when extraction fails entirely, `best_text` holds the
/// error description behind [`ERROR_MARKER`] and the counts are zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Text of the winning strategy, trimmed.
    pub best_text: String,
    /// Name of the winning strategy, or `"Error"`.
    pub method_used: String,
    /// Strategy name to trimmed text, successful strategies only.
    pub all_results: BTreeMap<String, String>,
    /// Heuristic 0-100 confidence score for the winning text.
    pub confidence: u32,
    /// Number of strategies attempted.
    pub total_methods_tried: usize,
    /// Number of strategies that produced text.
    pub successful_methods: usize,
    /// Underlying error description for the error state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Translation of the winning text, when one was attempted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<TranslationResult>,
}

impl ExtractionResult {
    /// Build the distinguished error state: no candidates, confidence 0.
    pub fn error_state(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            best_text: format!("{}{}", ERROR_MARKER, message),
            method_used: "Error".to_string(),
            all_results: BTreeMap::new(),
            confidence: 0,
            total_methods_tried: 0,
            successful_methods: 0,
            error: Some(message),
            translation: None,
        }
    }

    /// Whether this result is the error state.
    pub fn is_error(&self) -> bool {
        self.best_text.starts_with(ERROR_MARKER)
    }

    /// Whether the winning text is worth translating: non-empty and not an
    /// error description.
    pub fn has_usable_text(&self) -> bool {
        !self.is_error() && !self.best_text.trim().is_empty()
    }
}

/// Outcome of one translation request.
///
/// Never absent a translated field: when translation is skipped or fails, the
/// original text is echoed and `translation_success` is false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    /// Translated text, or the echoed input on skip/failure.
    pub translated_text: String,
    /// The text translation was requested for, untouched.
    pub original_text: String,
    /// Source language detected by the service, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
    /// Target language code the translation was requested in.
    pub target_language: String,
    /// Whether the service produced a translation.
    pub translation_success: bool,
    /// Why translation was skipped or failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Name of the translation service, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translator_service: Option<String>,
}

impl TranslationResult {
    /// Translation not attempted; echoes the trimmed input.
    pub fn skipped(original: &str, target: &str, reason: &str) -> Self {
        Self {
            translated_text: original.trim().to_string(),
            original_text: original.to_string(),
            detected_language: None,
            target_language: target.to_string(),
            translation_success: false,
            error: Some(reason.to_string()),
            translator_service: None,
        }
    }

    /// Translation attempted but the capability failed; echoes the original
    /// text untouched.
    pub fn failed(original: &str, target: &str, error: String) -> Self {
        Self {
            translated_text: original.to_string(),
            original_text: original.to_string(),
            detected_language: None,
            target_language: target.to_string(),
            translation_success: false,
            error: Some(error),
            translator_service: None,
        }
    }
}

/// Basic information about a stored image file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    /// Name the file was uploaded under.
    pub filename: String,
    /// Path the file was stored at.
    pub saved_path: String,
    /// Image format, e.g. `JPEG`.
    pub format: String,
    /// Color mode, e.g. `RGB` or `L`.
    pub mode: String,
    pub width: u32,
    pub height: u32,
    pub file_size_bytes: u64,
    /// RFC 3339 timestamp of when the info was taken.
    pub upload_time: String,
}

/// One entry in the stored-uploads listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFile {
    pub filename: String,
    pub path: String,
    pub size: u64,
    /// RFC 3339 modification time.
    pub modified: String,
}
