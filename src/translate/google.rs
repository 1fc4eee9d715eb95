//! Google Translate client.
//!
//! Uses the unauthenticated `translate_a/single` endpoint with automatic
//! source-language detection. The response is a positional JSON array:
//! translated segments at `[0][i][0]`, detected source language at `[2]`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::api::{ApiTranslation, TranslateError, TranslationApi};

/// Default endpoint for the public translate API.
pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// HTTP client for the Google translate endpoint.
pub struct GoogleTranslateClient {
    client: Client,
    endpoint: String,
}

impl GoogleTranslateClient {
    /// Create a new client with the given endpoint and request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl TranslationApi for GoogleTranslateClient {
    async fn translate(&self, text: &str, dest: &str) -> Result<ApiTranslation, TranslateError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", dest),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| TranslateError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(TranslateError::Api(format!("HTTP {}", resp.status())));
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| TranslateError::Parse(e.to_string()))?;

        parse_response(&body)
    }
}

/// Parse the positional response array into a translation.
fn parse_response(body: &serde_json::Value) -> Result<ApiTranslation, TranslateError> {
    let segments = body
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslateError::Parse("missing translation segments".to_string()))?;

    let mut text = String::new();
    for segment in segments {
        if let Some(piece) = segment.get(0).and_then(|v| v.as_str()) {
            text.push_str(piece);
        }
    }

    if text.is_empty() {
        return Err(TranslateError::Parse("empty translation".to_string()));
    }

    let detected_source = body
        .get(2)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    Ok(ApiTranslation {
        text,
        detected_source,
    })
}
