//! Web server for the OCR and translation service.
//!
//! Thin transport layer over the extraction pipeline:
//! - JPEG upload with extraction and automatic translation
//! - Direct text translation
//! - Stored upload listing, details, and re-extraction
//! - Service self-check

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Settings;
use crate::ocr::{Extractor, OcrBackend, TesseractBackend};
use crate::pipeline::Pipeline;
use crate::storage::UploadStore;
use crate::translate::{GoogleTranslateClient, TranslationApi, Translator};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub store: Arc<UploadStore>,
    /// Kept alongside the pipeline so the self-check can report availability.
    pub ocr_backend: Arc<dyn OcrBackend>,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Build state with the default backends from settings.
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let backend: Arc<dyn OcrBackend> = Arc::new(TesseractBackend::new());
        let api: Arc<dyn TranslationApi> = Arc::new(GoogleTranslateClient::new(
            &settings.translate_endpoint,
            Duration::from_secs(settings.translate_timeout_secs),
        ));
        let store = UploadStore::new(&settings.upload_dir)?;
        Ok(Self::with_parts(backend, api, store, settings))
    }

    /// Build state from explicit capabilities. Used by tests to substitute
    /// fakes for the OCR engine and the translation service.
    pub fn with_parts(
        backend: Arc<dyn OcrBackend>,
        api: Arc<dyn TranslationApi>,
        store: UploadStore,
        settings: &Settings,
    ) -> Self {
        let extractor = Extractor::new(backend.clone(), &settings.ocr_language);
        let translator = Translator::new(api, &settings.default_target_language);
        Self {
            pipeline: Arc::new(Pipeline::new(extractor, translator)),
            store: Arc::new(store),
            ocr_backend: backend,
            max_upload_bytes: settings.max_upload_bytes,
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;

    tracing::info!("Upload folder: {}", state.store.dir().display());
    if !state.ocr_backend.is_available() {
        tracing::warn!("{}", state.ocr_backend.availability_hint());
    }

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use image::DynamicImage;
    use tempfile::tempdir;
    use tower::ServiceExt;

    use super::*;
    use crate::ocr::{OcrError, OcrOptions};
    use crate::translate::{ApiTranslation, TranslateError};

    /// OCR fake: returns a longer reading for PSM 3 so winner selection is
    /// exercised through the HTTP layer.
    struct FakeOcr;

    impl OcrBackend for FakeOcr {
        fn recognize(
            &self,
            _image: &DynamicImage,
            options: &OcrOptions,
        ) -> Result<String, OcrError> {
            Ok(match options.psm {
                3 => "a longer automatic segmentation reading".to_string(),
                _ => "hello world".to_string(),
            })
        }

        fn is_available(&self) -> bool {
            true
        }

        fn availability_hint(&self) -> String {
            "fake OCR".to_string()
        }
    }

    struct FakeTranslate;

    #[async_trait]
    impl TranslationApi for FakeTranslate {
        async fn translate(&self, text: &str, dest: &str) -> Result<ApiTranslation, TranslateError> {
            Ok(ApiTranslation {
                text: format!("[{}] {}", dest, text),
                detected_source: Some("en".to_string()),
            })
        }
    }

    fn setup_test_app() -> (axum::Router, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let settings = Settings {
            upload_dir: dir.path().join("uploads"),
            ..Settings::default()
        };
        let store = UploadStore::new(&settings.upload_dir).unwrap();
        let state = AppState::with_parts(
            Arc::new(FakeOcr),
            Arc::new(FakeTranslate),
            store,
            &settings,
        );
        (create_router(state), dir)
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Jpeg)
            .unwrap();
        out.into_inner()
    }

    const BOUNDARY: &str = "test-boundary";

    fn multipart_body(filename: &str, bytes: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
                 Content-Type: image/jpeg\r\n\r\n",
                BOUNDARY, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn upload_request(filename: &str, bytes: &[u8]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(filename, bytes)))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_upload_extracts_and_translates() {
        let (app, _dir) = setup_test_app();

        let response = app
            .oneshot(upload_request("photo.jpg", &jpeg_bytes(64, 32)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;

        assert_eq!(json["original_name"], "photo.jpg");
        assert!(json["filename"].as_str().unwrap().starts_with("photo_"));
        assert_eq!(json["info"]["width"], 64);
        assert_eq!(json["info"]["format"], "JPEG");

        let extracted = &json["extracted_text"];
        // PSM 3 produces the longest reading with the fake backend
        assert_eq!(extracted["method_used"], "PSM 3");
        assert_eq!(
            extracted["best_text"],
            "a longer automatic segmentation reading"
        );
        assert_eq!(extracted["total_methods_tried"], 5);
        assert_eq!(extracted["successful_methods"], 5);

        let translation = &extracted["translation"];
        assert_eq!(translation["translation_success"], true);
        assert_eq!(
            translation["translated_text"],
            "[bn] a longer automatic segmentation reading"
        );
    }

    #[tokio::test]
    async fn test_upload_rejects_non_jpeg() {
        let (app, _dir) = setup_test_app();

        let response = app
            .oneshot(upload_request("photo.png", &jpeg_bytes(8, 8)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Only JPG files are allowed");
    }

    #[tokio::test]
    async fn test_upload_without_file_field() {
        let (app, _dir) = setup_test_app();

        let body = format!("--{}--\r\n", BOUNDARY);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/upload")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={}", BOUNDARY),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "No file provided");
    }

    #[tokio::test]
    async fn test_upload_with_corrupt_jpeg_returns_error_state() {
        let (app, _dir) = setup_test_app();

        let response = app
            .oneshot(upload_request("broken.jpg", b"not really a jpeg"))
            .await
            .unwrap();

        // Degradation, not a hard failure: the file is saved, extraction
        // reports the decode error in-band.
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let extracted = &json["extracted_text"];
        assert_eq!(extracted["method_used"], "Error");
        assert_eq!(extracted["confidence"], 0);
        assert!(extracted["best_text"]
            .as_str()
            .unwrap()
            .starts_with("Error extracting text:"));
        assert!(extracted.get("translation").is_none());
    }

    #[tokio::test]
    async fn test_translate_endpoint() {
        let (app, _dir) = setup_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/translate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"text": "good morning"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Translation completed");
        assert_eq!(json["translation"]["translated_text"], "[bn] good morning");
        assert_eq!(json["translation"]["target_language"], "bn");
    }

    #[tokio::test]
    async fn test_translate_with_explicit_target() {
        let (app, _dir) = setup_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/translate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"text": "good morning", "target_language": "fr"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["translation"]["translated_text"], "[fr] good morning");
    }

    #[tokio::test]
    async fn test_translate_without_text_is_rejected() {
        let (app, _dir) = setup_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/translate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"target_language": "fr"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "No text provided");
    }

    #[tokio::test]
    async fn test_files_listing() {
        let (app, _dir) = setup_test_app();

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/files").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["count"], 0);

        app.clone()
            .oneshot(upload_request("photo.jpg", &jpeg_bytes(8, 8)))
            .await
            .unwrap();

        let response = app
            .oneshot(Request::builder().uri("/files").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["count"], 1);
        assert!(json["files"][0]["filename"]
            .as_str()
            .unwrap()
            .starts_with("photo_"));
    }

    #[tokio::test]
    async fn test_file_details_and_reextract() {
        let (app, _dir) = setup_test_app();

        let response = app
            .clone()
            .oneshot(upload_request("photo.jpg", &jpeg_bytes(16, 16)))
            .await
            .unwrap();
        let stored = body_json(response).await["filename"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/file/{}", stored))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["info"]["width"], 16);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/extract_text/{}", stored))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Text extraction completed");
        assert_eq!(json["extracted_text"]["successful_methods"], 5);
    }

    #[tokio::test]
    async fn test_file_details_not_found() {
        let (app, _dir) = setup_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/file/missing.jpg")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_extract_text_not_found() {
        let (app, _dir) = setup_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/extract_text/missing.jpg")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_self_check() {
        let (app, _dir) = setup_test_app();

        let response = app
            .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Server is running");
        assert_eq!(json["tesseract_available"], true);
        assert_eq!(json["google_translate_working"], true);
        assert_eq!(json["upload_folder_exists"], true);
        assert_eq!(json["default_target_language"], "bn");
    }
}
