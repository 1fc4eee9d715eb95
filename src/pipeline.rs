//! The extract-and-translate pipeline.
//!
//! Composes the OCR extractor with the translation adapter. Extraction is
//! CPU- and subprocess-bound, so it runs on the blocking pool.

use crate::models::{ExtractionResult, TranslationResult};
use crate::ocr::Extractor;
use crate::translate::Translator;

/// Extraction plus optional follow-up translation.
#[derive(Clone)]
pub struct Pipeline {
    extractor: Extractor,
    translator: Translator,
}

impl Pipeline {
    pub fn new(extractor: Extractor, translator: Translator) -> Self {
        Self {
            extractor,
            translator,
        }
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Decode image bytes and extract text with every strategy.
    pub async fn extract(&self, image_bytes: Vec<u8>) -> ExtractionResult {
        let extractor = self.extractor.clone();
        tokio::task::spawn_blocking(move || extractor.extract(&image_bytes))
            .await
            .unwrap_or_else(|e| {
                ExtractionResult::error_state(format!("Extraction task failed: {}", e))
            })
    }

    /// Extract, then translate the winning text when it is usable.
    ///
    /// Translation is attempted only for a non-empty winner that is not an
    /// error description; the adapter still skips the network round trip for
    /// texts under its minimum length.
    pub async fn extract_and_translate(
        &self,
        image_bytes: Vec<u8>,
        target: Option<&str>,
    ) -> (ExtractionResult, Option<TranslationResult>) {
        let extraction = self.extract(image_bytes).await;

        if !extraction.has_usable_text() {
            return (extraction, None);
        }

        let translation = match target {
            Some(code) => {
                self.translator
                    .translate_to(&extraction.best_text, code)
                    .await
            }
            None => self.translator.translate(&extraction.best_text).await,
        };

        (extraction, Some(translation))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use image::DynamicImage;

    use super::*;
    use crate::ocr::{OcrBackend, OcrError, OcrOptions};
    use crate::translate::{ApiTranslation, TranslateError, TranslationApi};

    /// Backend that returns a fixed reading for every strategy.
    struct FixedBackend(&'static str);

    impl OcrBackend for FixedBackend {
        fn recognize(
            &self,
            _image: &DynamicImage,
            _options: &OcrOptions,
        ) -> Result<String, OcrError> {
            Ok(self.0.to_string())
        }

        fn is_available(&self) -> bool {
            true
        }

        fn availability_hint(&self) -> String {
            "fixed".to_string()
        }
    }

    struct EchoApi;

    #[async_trait]
    impl TranslationApi for EchoApi {
        async fn translate(&self, text: &str, dest: &str) -> Result<ApiTranslation, TranslateError> {
            Ok(ApiTranslation {
                text: format!("[{}] {}", dest, text),
                detected_source: Some("en".to_string()),
            })
        }
    }

    fn pipeline(reading: &'static str) -> Pipeline {
        let extractor = Extractor::new(Arc::new(FixedBackend(reading)), "eng");
        let translator = Translator::new(Arc::new(EchoApi), "bn");
        Pipeline::new(extractor, translator)
    }

    fn white_jpeg() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(64, 32, image::Rgb([255, 255, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Jpeg)
            .unwrap();
        out.into_inner()
    }

    #[tokio::test]
    async fn test_usable_text_is_translated() {
        let (extraction, translation) = pipeline("AB").extract_and_translate(white_jpeg(), None).await;
        assert_eq!(extraction.best_text, "AB");
        let translation = translation.unwrap();
        assert!(translation.translation_success);
        assert_eq!(translation.translated_text, "[bn] AB");
    }

    #[tokio::test]
    async fn test_short_winner_skips_network_but_reports_result() {
        let (extraction, translation) = pipeline("A").extract_and_translate(white_jpeg(), None).await;
        assert_eq!(extraction.best_text, "A");
        let translation = translation.unwrap();
        assert!(!translation.translation_success);
        assert_eq!(translation.error.as_deref(), Some("Text too short to translate"));
    }

    #[tokio::test]
    async fn test_empty_winner_is_not_translated() {
        let (extraction, translation) = pipeline("").extract_and_translate(white_jpeg(), None).await;
        assert_eq!(extraction.best_text, "");
        assert!(translation.is_none());
    }

    #[tokio::test]
    async fn test_decode_error_is_not_translated() {
        let (extraction, translation) = pipeline("text")
            .extract_and_translate(b"not an image".to_vec(), None)
            .await;
        assert!(extraction.is_error());
        assert!(translation.is_none());
    }

    #[tokio::test]
    async fn test_explicit_target_is_used() {
        let (_, translation) = pipeline("hello world")
            .extract_and_translate(white_jpeg(), Some("de"))
            .await;
        assert_eq!(translation.unwrap().target_language, "de");
    }
}
