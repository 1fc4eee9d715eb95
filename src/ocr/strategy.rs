//! The fixed strategy catalog.
//!
//! Strategies are data, not branching code: an ordered list of
//! (name, transform, OCR options) entries iterated uniformly by the
//! extractor. Catalog order is the tie-break for winner selection and decides
//! which failure message is reported when every strategy fails.

use image::DynamicImage;

use super::backend::OcrOptions;
use super::preprocess;

/// Characters the Original strategy restricts recognition to.
const ALPHANUMERIC_WHITELIST: &str =
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz ";

/// The preprocessing transform a strategy applies before OCR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Use the normalized image untouched.
    Identity,
    /// Single-channel luminance conversion.
    Grayscale,
    /// Contrast then brightness boost.
    Enhance,
    /// Blur, adaptive threshold and morphological cleanup.
    Document,
}

impl Transform {
    /// Produce this transform's rendering of the image. Pure; the input is
    /// never modified.
    pub fn apply(&self, image: &DynamicImage) -> DynamicImage {
        match self {
            Transform::Identity => image.clone(),
            Transform::Grayscale => preprocess::grayscale(image),
            Transform::Enhance => preprocess::enhance(image),
            Transform::Document => preprocess::document(image),
        }
    }
}

/// One entry in the strategy catalog.
#[derive(Debug, Clone)]
pub struct Strategy {
    pub name: &'static str,
    pub transform: Transform,
    pub psm: u32,
    pub whitelist: Option<&'static str>,
}

impl Strategy {
    /// OCR options for this strategy under the configured language.
    pub fn options(&self, language: &str) -> OcrOptions {
        OcrOptions {
            psm: self.psm,
            whitelist: self.whitelist,
            language: language.to_string(),
        }
    }
}

/// The fixed, ordered strategy catalog.
pub fn catalog() -> [Strategy; 5] {
    [
        Strategy {
            name: "Original",
            transform: Transform::Identity,
            psm: 6,
            whitelist: Some(ALPHANUMERIC_WHITELIST),
        },
        Strategy {
            name: "Grayscale",
            transform: Transform::Grayscale,
            psm: 6,
            whitelist: None,
        },
        Strategy {
            name: "Enhanced",
            transform: Transform::Enhance,
            psm: 6,
            whitelist: None,
        },
        Strategy {
            name: "Preprocessed",
            transform: Transform::Document,
            psm: 6,
            whitelist: None,
        },
        Strategy {
            name: "PSM 3",
            transform: Transform::Identity,
            psm: 3,
            whitelist: None,
        },
    ]
}

/// Output of running one strategy: recognized text or the failure reason.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Name of the strategy that produced this candidate.
    pub strategy: &'static str,
    /// Trimmed text on success, error description on failure.
    pub outcome: Result<String, String>,
}

impl Candidate {
    /// The recognized text, when the strategy succeeded.
    pub fn text(&self) -> Option<&str> {
        self.outcome.as_ref().ok().map(|s| s.as_str())
    }

    /// The failure reason, when the strategy failed.
    pub fn failure(&self) -> Option<&str> {
        self.outcome.as_ref().err().map(|s| s.as_str())
    }
}
