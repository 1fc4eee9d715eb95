//! Multi-strategy text extraction.

use std::collections::BTreeMap;
use std::sync::Arc;

use image::DynamicImage;

use crate::models::{ExtractionResult, ERROR_MARKER};

use super::backend::OcrBackend;
use super::strategy::{catalog, Candidate};

/// Runs every catalog strategy against an image and selects the best reading.
#[derive(Clone)]
pub struct Extractor {
    backend: Arc<dyn OcrBackend>,
    language: String,
}

impl Extractor {
    /// Create an extractor over the given OCR backend.
    pub fn new(backend: Arc<dyn OcrBackend>, language: impl Into<String>) -> Self {
        Self {
            backend,
            language: language.into(),
        }
    }

    /// Decode image bytes and extract text with every strategy.
    ///
    /// Never fails: decode errors and total OCR failure are reported as the
    /// error-state result.
    pub fn extract(&self, image_bytes: &[u8]) -> ExtractionResult {
        let image = match image::load_from_memory(image_bytes) {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!("failed to decode image: {}", e);
                return ExtractionResult::error_state(format!("Failed to load image: {}", e));
            }
        };
        self.extract_image(&image)
    }

    /// Extract text from an already decoded image.
    pub fn extract_image(&self, image: &DynamicImage) -> ExtractionResult {
        // Normalize to RGB before any strategy branches.
        let normalized = DynamicImage::ImageRgb8(image.to_rgb8());
        let candidates = self.run_strategies(&normalized);
        select_result(&candidates)
    }

    /// Run each strategy in catalog order, isolating per-strategy failures.
    fn run_strategies(&self, image: &DynamicImage) -> Vec<Candidate> {
        catalog()
            .iter()
            .map(|strategy| {
                let rendered = strategy.transform.apply(image);
                let outcome = self
                    .backend
                    .recognize(&rendered, &strategy.options(&self.language))
                    .map(|text| text.trim().to_string())
                    .map_err(|e| e.to_string());
                match &outcome {
                    Ok(text) => tracing::debug!(
                        strategy = strategy.name,
                        chars = text.chars().count(),
                        "strategy succeeded"
                    ),
                    Err(e) => {
                        tracing::debug!(strategy = strategy.name, error = %e, "strategy failed")
                    }
                }
                Candidate {
                    strategy: strategy.name,
                    outcome,
                }
            })
            .collect()
    }
}

/// Pick the winner among successful candidates and assemble the aggregate.
///
/// The winner is the longest trimmed text, not the highest confidence score;
/// the score is computed for the already-selected winner. Ties resolve to the
/// earliest strategy in catalog order.
///
/// TODO: length-based selection lets a long garbled reading beat a short
/// accurate one; consider scoring every candidate and selecting by
/// confidence.
fn select_result(candidates: &[Candidate]) -> ExtractionResult {
    let successes: Vec<(&'static str, &str)> = candidates
        .iter()
        .filter_map(|c| c.text().map(|t| (c.strategy, t)))
        .collect();

    if successes.is_empty() {
        let last_error = candidates
            .iter()
            .filter_map(|c| c.failure())
            .last()
            .unwrap_or("Unknown error");
        return ExtractionResult::error_state(format!(
            "All OCR methods failed. Last error: {}",
            last_error
        ));
    }

    // Strictly-greater comparison keeps the earliest candidate on ties.
    let mut best = successes[0];
    for &(name, text) in &successes[1..] {
        if text.chars().count() > best.1.chars().count() {
            best = (name, text);
        }
    }

    let all_results: BTreeMap<String, String> = successes
        .iter()
        .map(|(name, text)| (name.to_string(), text.to_string()))
        .collect();

    tracing::debug!(
        method = best.0,
        chars = best.1.chars().count(),
        successes = successes.len(),
        "selected best OCR result"
    );

    ExtractionResult {
        best_text: best.1.to_string(),
        method_used: best.0.to_string(),
        confidence: text_confidence(best.1),
        all_results,
        total_methods_tried: candidates.len(),
        successful_methods: successes.len(),
        error: None,
        translation: None,
    }
}

/// Heuristic 0-100 confidence score for extracted text.
///
/// Additive tiers for length and word count plus a bonus proportional to the
/// share of alphanumeric characters, capped at 100. Empty text and error
/// descriptions score exactly 0.
pub fn text_confidence(text: &str) -> u32 {
    let clean = text.trim();
    if clean.is_empty() || clean.starts_with(ERROR_MARKER.trim_end()) {
        return 0;
    }

    let mut score = 0u32;

    let chars = clean.chars().count();
    score += match chars {
        n if n > 50 => 40,
        n if n > 20 => 25,
        n if n > 5 => 15,
        _ => 0,
    };

    score += match clean.split_whitespace().count() {
        n if n > 10 => 30,
        n if n > 5 => 20,
        n if n > 1 => 10,
        _ => 0,
    };

    let alphanumeric = clean.chars().filter(|c| c.is_alphanumeric()).count();
    score += (alphanumeric as f64 / chars as f64 * 30.0) as u32;

    score.min(100)
}
