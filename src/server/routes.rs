//! Router configuration for the web server.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        // Upload: save, extract, translate
        .route("/upload", post(handlers::upload_file))
        // Direct text translation
        .route("/translate", post(handlers::translate_text))
        // Re-run extraction on a stored upload
        .route("/extract_text/:filename", post(handlers::extract_text_from_file))
        // Stored upload listing and details
        .route("/files", get(handlers::list_files))
        .route("/file/:filename", get(handlers::file_details))
        // Service self-check
        .route("/test", get(handlers::self_test))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
