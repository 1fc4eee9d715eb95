//! Endpoint handlers.
//!
//! Only malformed requests produce 4xx responses; every pipeline degradation
//! (failed strategies, failed translation) is a 200 with explicit success
//! flags in the body.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::storage::{self, has_allowed_extension, StorageError};

use super::AppState;

/// Uniform error body.
fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// POST /upload - accept a JPEG, extract text, translate the winner.
pub async fn upload_file(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut override_name: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Invalid multipart body: {}", e),
                )
            }
        };
        match field.name() {
            Some("file") => {
                file_name = field.file_name().map(|s| s.to_string());
                match field.bytes().await {
                    Ok(bytes) => file_bytes = Some(bytes.to_vec()),
                    Err(e) => {
                        return error_response(
                            StatusCode::BAD_REQUEST,
                            format!("Failed to read upload: {}", e),
                        )
                    }
                }
            }
            Some("filename") => {
                override_name = field.text().await.ok();
            }
            _ => {}
        }
    }

    let Some(bytes) = file_bytes else {
        return error_response(StatusCode::BAD_REQUEST, "No file provided");
    };
    let original_name = override_name.or(file_name).unwrap_or_default();
    if original_name.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No file selected");
    }
    // Reject by extension before any decode work
    if !has_allowed_extension(&original_name) {
        return error_response(StatusCode::BAD_REQUEST, "Only JPG files are allowed");
    }

    let (stored_name, stored_path) = match state.store.save(&original_name, &bytes) {
        Ok(saved) => saved,
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Server error: {}", e),
            )
        }
    };

    let info = storage::image_file_info(&stored_path, &original_name).ok();

    let (mut extraction, translation) = state.pipeline.extract_and_translate(bytes, None).await;
    extraction.translation = translation;

    tracing::info!(
        file = %stored_name,
        method = %extraction.method_used,
        confidence = extraction.confidence,
        "upload processed"
    );

    Json(json!({
        "message": "File uploaded, text extracted, and translated successfully",
        "filename": stored_name,
        "original_name": original_name,
        "path": stored_path.display().to_string(),
        "info": info,
        "extracted_text": extraction,
    }))
    .into_response()
}

/// Request body for direct translation.
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: Option<String>,
    pub target_language: Option<String>,
}

/// POST /translate - translate arbitrary text.
pub async fn translate_text(
    State(state): State<AppState>,
    Json(req): Json<TranslateRequest>,
) -> Response {
    let Some(text) = req.text else {
        return error_response(StatusCode::BAD_REQUEST, "No text provided");
    };

    let translator = state.pipeline.translator();
    let result = match req.target_language.as_deref() {
        Some(code) => translator.translate_to(&text, code).await,
        None => translator.translate(&text).await,
    };

    Json(json!({
        "message": "Translation completed",
        "translation": result,
    }))
    .into_response()
}

/// POST /extract_text/:filename - re-run extraction on a stored upload.
pub async fn extract_text_from_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Response {
    let bytes = match state.store.read(&filename) {
        Ok(bytes) => bytes,
        Err(StorageError::NotFound(_)) => {
            return error_response(StatusCode::NOT_FOUND, "File not found")
        }
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Server error: {}", e),
            )
        }
    };

    let extraction = state.pipeline.extract(bytes).await;

    Json(json!({
        "filename": filename,
        "extracted_text": extraction,
        "message": "Text extraction completed",
    }))
    .into_response()
}

/// GET /files - list stored JPEG uploads.
pub async fn list_files(State(state): State<AppState>) -> Response {
    match state.store.list() {
        Ok(files) => {
            let count = files.len();
            Json(json!({ "files": files, "count": count })).into_response()
        }
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// GET /file/:filename - details of one stored upload.
pub async fn file_details(State(state): State<AppState>, Path(filename): Path<String>) -> Response {
    let path = match state.store.resolve(&filename) {
        Ok(path) => path,
        Err(_) => return error_response(StatusCode::NOT_FOUND, "File not found"),
    };

    match storage::image_file_info(&path, &filename) {
        Ok(info) => Json(json!({ "filename": filename, "info": info })).into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// GET /test - service self-check.
pub async fn self_test(State(state): State<AppState>) -> Response {
    let translation_working = state.pipeline.translator().probe().await;

    Json(json!({
        "message": "Server is running",
        "tesseract_available": state.ocr_backend.is_available(),
        "tesseract_hint": state.ocr_backend.availability_hint(),
        "google_translate_working": translation_working,
        "default_target_language": state.pipeline.translator().default_target(),
        "upload_folder": state.store.dir().display().to_string(),
        "upload_folder_exists": state.store.dir().exists(),
    }))
    .into_response()
}
