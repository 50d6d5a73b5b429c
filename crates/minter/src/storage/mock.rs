use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use solana_sdk::hash::hash;

use super::{StorageFile, Uploader};
use crate::core::{MinterError, MinterResult, MOCK_STORAGE_BASE_URL};

/// In-memory storage handing out content-addressed URIs
///
/// Nothing leaves the process; uploaded files can be read back with
/// [`MockStorage::download`].
pub struct MockStorage {
    base_url: String,
    files: Mutex<HashMap<String, StorageFile>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::with_base_url(MOCK_STORAGE_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        Self {
            base_url,
            files: Mutex::new(HashMap::new()),
        }
    }

    /// URI a file with these bytes is stored under
    pub fn uri_for(&self, bytes: &[u8]) -> String {
        format!("{}{}", self.base_url, hash(bytes))
    }

    /// Fetch a previously uploaded file
    pub fn download(&self, uri: &str) -> MinterResult<StorageFile> {
        self.files
            .lock()
            .map_err(|_| MinterError::Upload("mock storage lock poisoned".to_string()))?
            .get(uri)
            .cloned()
            .ok_or_else(|| MinterError::Upload(format!("no file stored at {}", uri)))
    }

    /// Number of distinct files held
    pub fn len(&self) -> usize {
        self.files.lock().map(|files| files.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Uploader for MockStorage {
    async fn upload(&self, files: Vec<StorageFile>) -> MinterResult<Vec<String>> {
        let mut stored = self
            .files
            .lock()
            .map_err(|_| MinterError::Upload("mock storage lock poisoned".to_string()))?;

        let mut uris = Vec::with_capacity(files.len());
        for file in files {
            let uri = self.uri_for(&file.bytes);
            log::debug!("Stored {} ({} bytes) at {}", file.file_name, file.bytes.len(), uri);
            stored.insert(uri.clone(), file);
            uris.push(uri);
        }

        Ok(uris)
    }
}
