//! Image loading for model requests.

use base64::{engine::general_purpose, Engine};
use std::path::{Path, PathBuf};

/// Image bytes ready to attach to a model request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub source: PathBuf,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// `data:` URL as accepted by OpenAI-compatible vision endpoints.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

pub trait ImageLoader: Send + Sync {
    fn load(&self, path: &Path) -> anyhow::Result<EncodedImage>;
}

/// Reads images straight from disk; the model server does its own resizing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageLoader;

impl ImageLoader for FsImageLoader {
    fn load(&self, path: &Path) -> anyhow::Result<EncodedImage> {
        let bytes = std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("failed to read image {}: {}", path.display(), e))?;
        Ok(EncodedImage {
            source: path.to_path_buf(),
            mime: mime_for(path),
            bytes,
        })
    }
}

pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "bmp" => "image/bmp",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        _ => "image/png",
    }
}
