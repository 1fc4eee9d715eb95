//! Tesseract OCR backend implementation.
//!
//! Uses Tesseract OCR via command-line for text extraction. The image is
//! written to a temporary PNG, since the binary reads from disk.

use std::path::Path;
use std::process::Command;

use image::DynamicImage;
use tempfile::TempDir;

use super::backend::{OcrBackend, OcrError, OcrOptions};

/// Tesseract OCR backend.
pub struct TesseractBackend;

impl TesseractBackend {
    /// Create a new Tesseract backend.
    pub fn new() -> Self {
        Self
    }

    /// Run Tesseract on an image file.
    fn run_tesseract(&self, image_path: &Path, options: &OcrOptions) -> Result<String, OcrError> {
        let mut cmd = Command::new("tesseract");
        cmd.arg(image_path)
            .arg("stdout")
            .args(["-l", &options.language])
            .args(["--psm", &options.psm.to_string()]);
        if let Some(whitelist) = options.whitelist {
            cmd.args(["-c", &format!("tessedit_char_whitelist={}", whitelist)]);
        }

        match cmd.output() {
            Ok(output) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(OcrError::OcrFailed(format!("tesseract failed: {}", stderr)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OcrError::BackendNotAvailable(
                    "tesseract not found (install tesseract-ocr)".to_string(),
                ))
            }
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBackend for TesseractBackend {
    fn recognize(&self, image: &DynamicImage, options: &OcrOptions) -> Result<String, OcrError> {
        let temp_dir = TempDir::new()?;
        let image_path = temp_dir.path().join("input.png");
        image
            .save(&image_path)
            .map_err(|e| OcrError::Image(format!("failed to write image: {}", e)))?;

        self.run_tesseract(&image_path, options)
    }

    fn is_available(&self) -> bool {
        which::which("tesseract").is_ok()
    }

    fn availability_hint(&self) -> String {
        if self.is_available() {
            "Tesseract is available".to_string()
        } else {
            "Tesseract not installed. Install with: apt install tesseract-ocr".to_string()
        }
    }
}
