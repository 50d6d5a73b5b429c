//! Uploads the token image and its metadata document

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{MinterError, MinterResult};
use crate::storage::{content_type_for, StorageFile, Uploader};

/// Off-chain metadata document referenced by the on-chain metadata account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub description: String,
    /// URI of the uploaded image
    pub image: String,
}

pub struct AssetUploader<'a> {
    uploader: &'a dyn Uploader,
}

impl<'a> AssetUploader<'a> {
    pub fn new(uploader: &'a dyn Uploader) -> Self {
        Self { uploader }
    }

    /// Read the image at `path` and upload it, returning its URI
    pub async fn upload_image(&self, path: &Path) -> MinterResult<String> {
        let bytes = tokio::fs::read(path).await.map_err(|source| {
            let err = MinterError::ReadFile {
                path: path.to_path_buf(),
                source,
            };
            log::error!("Error uploading image: {}", err);
            err
        })?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();
        let file = StorageFile::new(file_name, content_type_for(path), bytes);

        let uri = self.upload_single(file).await.map_err(|e| {
            log::error!("Error uploading image: {}", e);
            e
        })?;

        log::info!("Image uploaded successfully");
        log::info!("URI: {}", uri);
        Ok(uri)
    }

    /// Serialize `metadata` to JSON and upload it, returning its URI
    pub async fn upload_metadata(&self, metadata: &TokenMetadata) -> MinterResult<String> {
        let body = serde_json::to_string(metadata)?;
        let uri = self
            .upload_single(StorageFile::json("metadata.json", body))
            .await
            .map_err(|e| {
                log::error!("Error uploading metadata: {}", e);
                e
            })?;

        log::info!("Metadata uploaded successfully");
        log::info!("URI: {}", uri);
        Ok(uri)
    }

    async fn upload_single(&self, file: StorageFile) -> MinterResult<String> {
        let uris = self.uploader.upload(vec![file]).await?;
        uris.into_iter()
            .next()
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| MinterError::Upload("uploader returned no URI".to_string()))
    }
}
