//! Lenslate - image OCR and translation service.
//!
//! Accepts uploaded JPEG images, extracts text with a set of preprocessing
//! strategies run against a single OCR backend, selects the best reading, and
//! translates it into a target language.

pub mod config;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod server;
pub mod storage;
pub mod translate;
