//! OCR backend abstraction.
//!
//! The extraction pipeline treats the OCR engine as a black box: given an
//! image and invocation options, produce recognized text or fail.

use image::DynamicImage;

/// Options for one OCR invocation.
#[derive(Debug, Clone)]
pub struct OcrOptions {
    /// Page segmentation mode.
    pub psm: u32,
    /// Restrict recognition to these characters when set.
    pub whitelist: Option<&'static str>,
    /// Recognition language.
    pub language: String,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            psm: 6,
            whitelist: None,
            language: "eng".to_string(),
        }
    }
}

/// Errors that can occur during OCR.
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    /// The backend binary or engine is not installed/usable.
    #[error("OCR backend not available: {0}")]
    BackendNotAvailable(String),
    /// The engine ran but failed to produce text.
    #[error("OCR failed: {0}")]
    OcrFailed(String),
    /// The image could not be prepared for the engine.
    #[error("image error: {0}")]
    Image(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A black-box OCR capability.
pub trait OcrBackend: Send + Sync {
    /// Recognize text in an image.
    fn recognize(&self, image: &DynamicImage, options: &OcrOptions) -> Result<String, OcrError>;

    /// Whether the backend can run on this host.
    fn is_available(&self) -> bool;

    /// Human-readable availability description for diagnostics.
    fn availability_hint(&self) -> String;
}
