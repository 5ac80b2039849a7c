use std::sync::Arc;

use crate::application::ports::DocumentSource;
use crate::application::services::{
    DocumentProcessorService, document_processor::DocumentProcessingError,
};
use crate::domain::repositories::ChunkRepository;

#[derive(Debug)]
pub enum IngestDocumentError {
    SchemaError(String),
    SourceError(String),
    EmbeddingError(String),
    StorageError(String),
    SchemaMismatch(String),
}

impl std::fmt::Display for IngestDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestDocumentError::SchemaError(msg) => write!(f, "Schema error: {}", msg),
            IngestDocumentError::SourceError(msg) => write!(f, "Source error: {}", msg),
            IngestDocumentError::EmbeddingError(msg) => write!(f, "Embedding error: {}", msg),
            IngestDocumentError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            IngestDocumentError::SchemaMismatch(msg) => write!(f, "Schema mismatch: {}", msg),
        }
    }
}

impl std::error::Error for IngestDocumentError {}

impl From<DocumentProcessingError> for IngestDocumentError {
    fn from(error: DocumentProcessingError) -> Self {
        match error {
            DocumentProcessingError::EmbeddingError(msg) => IngestDocumentError::EmbeddingError(msg),
            DocumentProcessingError::RepositoryError(msg) => IngestDocumentError::StorageError(msg),
            DocumentProcessingError::SchemaMismatch(msg) => IngestDocumentError::SchemaMismatch(msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IngestReport {
    pub document_name: String,
    pub chunk_count: usize,
    pub embedding_count: usize,
    pub rows_copied: usize,
}

pub struct IngestDocumentUseCase {
    document_source: Arc<dyn DocumentSource>,
    document_processor: Arc<DocumentProcessorService>,
    chunk_repository: Arc<dyn ChunkRepository>,
    embedding_dimension: usize,
    reset_table: bool,
}

impl IngestDocumentUseCase {
    pub fn new(
        document_source: Arc<dyn DocumentSource>,
        document_processor: Arc<DocumentProcessorService>,
        chunk_repository: Arc<dyn ChunkRepository>,
        embedding_dimension: usize,
        reset_table: bool,
    ) -> Self {
        Self {
            document_source,
            document_processor,
            chunk_repository,
            embedding_dimension,
            reset_table,
        }
    }

    /// Provisions the table, loads and splits the document, embeds every chunk
    /// in one batch and stores the rows in one bulk copy.
    pub async fn execute(&self) -> Result<IngestReport, IngestDocumentError> {
        let provisioned = if self.reset_table {
            tracing::warn!("Dropping and recreating the chunks table");
            self.chunk_repository
                .reset_schema(self.embedding_dimension)
                .await
        } else {
            self.chunk_repository
                .ensure_schema(self.embedding_dimension)
                .await
        };
        provisioned.map_err(|e| IngestDocumentError::SchemaError(e.to_string()))?;

        let document = self
            .document_source
            .load_document()
            .await
            .map_err(|e| IngestDocumentError::SourceError(e.to_string()))?;
        if !document.downloaded {
            tracing::info!("Using cached copy of {}", document.name);
        }
        println!("Downloaded {} successfully!", document.name);

        let chunks = self.document_processor.split_document(&document.text);
        println!("Split document into {} chunks.", chunks.len());

        let embeddings = self.document_processor.embed_chunks(&chunks).await?;
        println!("Generated embeddings for {} chunks.", embeddings.len());

        let chunk_count = chunks.len();
        let embedding_count = embeddings.len();
        let rows_copied = self
            .document_processor
            .store_chunks(chunks, embeddings)
            .await?;
        println!("Copied {} rows to the database.", rows_copied);

        Ok(IngestReport {
            document_name: document.name,
            chunk_count,
            embedding_count,
            rows_copied,
        })
    }
}
