//! Configuration management for the lenslate service.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Service settings, loaded from an optional TOML file with environment
/// overrides (`LENSLATE_*`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Bind address for the HTTP server.
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port for the HTTP server.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory where uploaded images are stored.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Recognition language passed to the OCR backend.
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,
    /// Target language used when a request does not specify one.
    #[serde(default = "default_target_language")]
    pub default_target_language: String,
    /// Translation API endpoint.
    #[serde(default = "default_translate_endpoint")]
    pub translate_endpoint: String,
    /// Timeout for translation requests, in seconds.
    #[serde(default = "default_translate_timeout_secs")]
    pub translate_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}
fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}
fn default_ocr_language() -> String {
    "eng".to_string()
}
fn default_target_language() -> String {
    "bn".to_string()
}
fn default_translate_endpoint() -> String {
    crate::translate::DEFAULT_ENDPOINT.to_string()
}
fn default_translate_timeout_secs() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            ocr_language: default_ocr_language(),
            default_target_language: default_target_language(),
            translate_endpoint: default_translate_endpoint(),
            translate_timeout_secs: default_translate_timeout_secs(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file when given, falling back to defaults,
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = match path {
            Some(p) => {
                let raw = fs::read_to_string(p)
                    .with_context(|| format!("reading config {}", p.display()))?;
                Self::from_toml_str(&raw)
                    .with_context(|| format!("parsing config {}", p.display()))?
            }
            None => Self::default(),
        };
        settings.apply_env();
        Ok(settings)
    }

    /// Parse settings from TOML. Missing keys take their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("LENSLATE_HOST") {
            self.host = v;
        }
        if let Ok(v) = std::env::var("LENSLATE_PORT") {
            if let Ok(port) = v.parse() {
                self.port = port;
            }
        }
        if let Ok(v) = std::env::var("LENSLATE_UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("LENSLATE_OCR_LANGUAGE") {
            self.ocr_language = v;
        }
        if let Ok(v) = std::env::var("LENSLATE_TARGET_LANGUAGE") {
            self.default_target_language = v;
        }
        if let Ok(v) = std::env::var("LENSLATE_TRANSLATE_ENDPOINT") {
            self.translate_endpoint = v;
        }
    }
}
