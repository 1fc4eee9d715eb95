//! OCR extraction module.
//!
//! Extracts text from images by running a fixed catalog of preprocessing
//! strategies against a single OCR backend:
//!
//! - **Original**: the untouched image with a character whitelist
//! - **Grayscale**: single-channel luminance conversion
//! - **Enhanced**: contrast and brightness boost
//! - **Preprocessed**: blur, adaptive threshold and morphological cleanup
//! - **PSM 3**: the untouched image under automatic page segmentation
//!
//! Each strategy is isolated; one failure never aborts the others. The
//! longest successful reading wins.
//!
//! The backend is abstracted behind [`OcrBackend`] so tests can substitute a
//! fake engine. Tesseract (via the system binary) is the default.

mod backend;
mod extract;
mod preprocess;
mod strategy;
mod tesseract;

pub use backend::{OcrBackend, OcrError, OcrOptions};
pub use extract::{text_confidence, Extractor};
pub use strategy::{catalog, Candidate, Strategy, Transform};
pub use tesseract::TesseractBackend;
