use async_trait::async_trait;

#[derive(Debug)]
pub enum DocumentSourceError {
    FetchFailed(String),
    IoError(String),
    InvalidEncoding(String),
}

impl std::fmt::Display for DocumentSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentSourceError::FetchFailed(msg) => write!(f, "Fetch failed: {}", msg),
            DocumentSourceError::IoError(msg) => write!(f, "IO error: {}", msg),
            DocumentSourceError::InvalidEncoding(msg) => write!(f, "Invalid encoding: {}", msg),
        }
    }
}

impl std::error::Error for DocumentSourceError {}

#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub text: String,
    /// False when the document came from the local cache.
    pub downloaded: bool,
}

#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn load_document(&self) -> Result<SourceDocument, DocumentSourceError>;
}
