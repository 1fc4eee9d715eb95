//! Upload storage: filename policy and on-disk persistence.
//!
//! The pipeline works on in-memory bytes; files are persisted here only so
//! uploads can be listed and re-processed later.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::DynamicImage;

use crate::models::{FileInfo, StoredFile};

/// Extensions accepted by the upload endpoint.
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

/// Fallback name when sanitization leaves nothing usable.
const FALLBACK_BASENAME: &str = "upload";

/// Errors from upload storage.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("image error: {0}")]
    Image(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Store for uploaded images.
#[derive(Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create the store, ensuring the directory exists.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save upload bytes under a sanitized, timestamp-suffixed name.
    ///
    /// Returns the stored name and full path. The file is fully written and
    /// closed before this returns.
    pub fn save(&self, original_name: &str, bytes: &[u8]) -> Result<(String, PathBuf), StorageError> {
        let name = timestamped_name(original_name, Local::now());
        let path = self.dir.join(&name);
        fs::write(&path, bytes)?;
        tracing::debug!(file = %name, bytes = bytes.len(), "upload saved");
        Ok((name, path))
    }

    /// Resolve a stored filename to its path, refusing anything that does not
    /// name a plain file directly inside the store.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, StorageError> {
        if sanitize_filename(filename) != filename {
            return Err(StorageError::NotFound(filename.to_string()));
        }
        let path = self.dir.join(filename);
        if !path.is_file() {
            return Err(StorageError::NotFound(filename.to_string()));
        }
        Ok(path)
    }

    /// Read a stored upload back into memory.
    pub fn read(&self, filename: &str) -> Result<Vec<u8>, StorageError> {
        Ok(fs::read(self.resolve(filename)?)?)
    }

    /// List stored JPEG uploads, sorted by name.
    pub fn list(&self) -> Result<Vec<StoredFile>, StorageError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if !has_allowed_extension(&name) {
                continue;
            }
            let metadata = entry.metadata()?;
            let modified = metadata
                .modified()
                .ok()
                .map(|t| DateTime::<Local>::from(t).to_rfc3339())
                .unwrap_or_default();
            files.push(StoredFile {
                filename: name,
                path: entry.path().display().to_string(),
                size: metadata.len(),
                modified,
            });
        }
        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(files)
    }
}

/// Inspect a stored image and report its basic properties.
pub fn image_file_info(path: &Path, original_name: &str) -> Result<FileInfo, StorageError> {
    let file_size_bytes = fs::metadata(path)?.len();

    let reader = image::ImageReader::open(path)?
        .with_guessed_format()
        .map_err(StorageError::Io)?;
    let format = reader
        .format()
        .map(|f| format!("{:?}", f).to_uppercase())
        .unwrap_or_else(|| "UNKNOWN".to_string());
    let image = reader
        .decode()
        .map_err(|e| StorageError::Image(e.to_string()))?;

    Ok(FileInfo {
        filename: original_name.to_string(),
        saved_path: path.display().to_string(),
        format,
        mode: color_mode(&image).to_string(),
        width: image.width(),
        height: image.height(),
        file_size_bytes,
        upload_time: Local::now().to_rfc3339(),
    })
}

/// Color-mode label for an image, PIL-style.
fn color_mode(image: &DynamicImage) -> &'static str {
    use image::ColorType;
    match image.color() {
        ColorType::L8 | ColorType::L16 => "L",
        ColorType::La8 | ColorType::La16 => "LA",
        ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => "RGB",
        ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => "RGBA",
        _ => "RGB",
    }
}

/// Sanitize an uploaded filename: path components dropped, anything outside
/// `[A-Za-z0-9._-]` replaced with underscore, leading and trailing dots and
/// underscores stripped. Never returns an empty string.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(['.', '_']).to_string();
    if cleaned.is_empty() {
        FALLBACK_BASENAME.to_string()
    } else {
        cleaned
    }
}

/// Collision-avoiding stored name: `{stem}_{YYYYmmdd_HHMMSS}{.ext}`.
pub fn timestamped_name(original: &str, now: DateTime<Local>) -> String {
    let sanitized = sanitize_filename(original);
    let (stem, ext) = match sanitized.rsplit_once('.') {
        Some((stem, ext)) => (stem.to_string(), format!(".{}", ext)),
        None => (sanitized, String::new()),
    };
    format!("{}_{}{}", stem, now.format("%Y%m%d_%H%M%S"), ext)
}

/// Whether the filename carries an accepted JPEG extension.
pub fn has_allowed_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
