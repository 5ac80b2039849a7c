use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use url::Url;

use crate::application::ports::document_source::{
    DocumentSource, DocumentSourceError, SourceDocument,
};

/// Downloads the document once and serves it from `cache_path` afterwards.
/// An existing file is never refreshed.
pub struct CachedDocumentSource {
    client: Client,
    source_url: Url,
    cache_path: PathBuf,
}

impl CachedDocumentSource {
    pub fn new(client: Client, source_url: Url, cache_path: PathBuf) -> Self {
        Self {
            client,
            source_url,
            cache_path,
        }
    }

    fn document_name(&self) -> String {
        self.cache_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.cache_path.to_string_lossy().to_string())
    }

    async fn download_to(&self, path: &Path) -> Result<(), DocumentSourceError> {
        let response = self
            .client
            .get(self.source_url.clone())
            .send()
            .await
            .map_err(|e| DocumentSourceError::FetchFailed(format!("Failed to fetch URL: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocumentSourceError::FetchFailed(format!(
                "{} returned {}",
                self.source_url, status
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            DocumentSourceError::FetchFailed(format!("Failed to read response: {}", e))
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DocumentSourceError::IoError(e.to_string()))?;
        }

        // Only a complete download ever appears at `path`.
        let partial = partial_path(path);
        fs::write(&partial, &bytes)
            .await
            .map_err(|e| DocumentSourceError::IoError(e.to_string()))?;
        fs::rename(&partial, path)
            .await
            .map_err(|e| DocumentSourceError::IoError(e.to_string()))?;

        tracing::info!("Saved {} bytes from {} to {:?}", bytes.len(), self.source_url, path);
        Ok(())
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

#[async_trait]
impl DocumentSource for CachedDocumentSource {
    async fn load_document(&self) -> Result<SourceDocument, DocumentSourceError> {
        let cached = fs::try_exists(&self.cache_path)
            .await
            .map_err(|e| DocumentSourceError::IoError(e.to_string()))?;

        if !cached {
            self.download_to(&self.cache_path).await?;
        }

        let bytes = fs::read(&self.cache_path)
            .await
            .map_err(|e| DocumentSourceError::IoError(e.to_string()))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| DocumentSourceError::InvalidEncoding(e.to_string()))?;

        Ok(SourceDocument {
            name: self.document_name(),
            text,
            downloaded: !cached,
        })
    }
}
