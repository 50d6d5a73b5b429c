//! Storage backends for the token image and metadata document

pub mod http;
pub mod mock;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::StorageConfig;
use crate::core::MinterResult;

pub use http::HttpUploader;
pub use mock::MockStorage;

/// A blob handed to an uploader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl StorageFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// JSON document with the given file name
    pub fn json(file_name: impl Into<String>, body: String) -> Self {
        Self::new(file_name, "application/json", body.into_bytes())
    }
}

/// Uploads a batch of files and returns one URI per file, in order
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, files: Vec<StorageFile>) -> MinterResult<Vec<String>>;
}

/// Build the uploader selected in the configuration
pub fn uploader_from_config(config: &StorageConfig) -> Arc<dyn Uploader> {
    match config {
        StorageConfig::Mock { base_url } => Arc::new(MockStorage::with_base_url(base_url)),
        StorageConfig::Http { endpoint } => Arc::new(HttpUploader::new(endpoint)),
    }
}

/// Guess a MIME type from the file extension
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(Path::new("logo.png")), "image/png");
        assert_eq!(content_type_for(Path::new("art/Logo.JPEG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("logo")), "application/octet-stream");
    }
}
