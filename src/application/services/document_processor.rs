use std::sync::Arc;

use crate::application::ports::{EmbeddingProvider, embedding_provider::BatchEmbeddingRequest};
use crate::domain::entities::{ContentChunk, Embedding};
use crate::domain::repositories::{ChunkRepository, chunk_repository::ChunkRepositoryError};

/// Every occurrence starts a new chunk; the heading marker itself is consumed.
pub const CHUNK_DELIMITER: &str = "\n## ";

pub const DOCUMENT_PREFIX: &str = "search_document: ";

#[derive(Debug)]
pub enum DocumentProcessingError {
    EmbeddingError(String),
    RepositoryError(String),
    SchemaMismatch(String),
}

impl std::fmt::Display for DocumentProcessingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentProcessingError::EmbeddingError(msg) => write!(f, "Embedding error: {}", msg),
            DocumentProcessingError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            DocumentProcessingError::SchemaMismatch(msg) => write!(f, "Schema mismatch: {}", msg),
        }
    }
}

impl std::error::Error for DocumentProcessingError {}

impl From<ChunkRepositoryError> for DocumentProcessingError {
    fn from(error: ChunkRepositoryError) -> Self {
        match error {
            ChunkRepositoryError::DimensionMismatch(msg) => DocumentProcessingError::SchemaMismatch(msg),
            _ => DocumentProcessingError::RepositoryError(error.to_string()),
        }
    }
}

/// Splits `text` on [`CHUNK_DELIMITER`]. The fragment before the first heading
/// and empty fragments are kept, so `n` delimiters always give `n + 1` chunks.
pub fn split_markdown_sections(text: &str) -> Vec<ContentChunk> {
    text.split(CHUNK_DELIMITER)
        .enumerate()
        .map(|(index, section)| ContentChunk::new(section.to_string(), index))
        .collect()
}

pub struct DocumentProcessorService {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    chunk_repository: Arc<dyn ChunkRepository>,
    embedding_dimension: usize,
}

impl DocumentProcessorService {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        chunk_repository: Arc<dyn ChunkRepository>,
        embedding_dimension: usize,
    ) -> Self {
        Self {
            embedding_provider,
            chunk_repository,
            embedding_dimension,
        }
    }

    pub fn split_document(&self, text: &str) -> Vec<ContentChunk> {
        let chunks = split_markdown_sections(text);
        tracing::debug!("Split {} bytes into {} chunks", text.len(), chunks.len());
        chunks
    }

    /// Embeds every chunk in a single batch request. The result is returned as
    /// the provider produced it; [`Self::store_chunks`] rejects a short batch.
    pub async fn embed_chunks(
        &self,
        chunks: &[ContentChunk],
    ) -> Result<Vec<Embedding>, DocumentProcessingError> {
        let texts: Vec<String> = chunks
            .iter()
            .map(|chunk| chunk.tagged(DOCUMENT_PREFIX))
            .collect();

        let batch_request = BatchEmbeddingRequest {
            texts,
            model_name: Some(self.embedding_provider.model_info()),
        };

        let batch_response = self
            .embedding_provider
            .generate_embeddings(batch_request)
            .await
            .map_err(|e| DocumentProcessingError::EmbeddingError(e.to_string()))?;

        tracing::debug!(
            "Model {} returned {} embeddings for {} chunks",
            batch_response.model_name,
            batch_response.embeddings.len(),
            chunks.len()
        );

        Ok(batch_response
            .embeddings
            .into_iter()
            .map(Embedding::new)
            .collect())
    }

    pub async fn store_chunks(
        &self,
        chunks: Vec<ContentChunk>,
        embeddings: Vec<Embedding>,
    ) -> Result<usize, DocumentProcessingError> {
        if chunks.len() != embeddings.len() {
            return Err(DocumentProcessingError::SchemaMismatch(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        for (chunk, embedding) in chunks.iter().zip(embeddings.iter()) {
            embedding
                .ensure_dimension(self.embedding_dimension)
                .map_err(|msg| {
                    DocumentProcessingError::SchemaMismatch(format!(
                        "chunk {}: {}",
                        chunk.chunk_index(),
                        msg
                    ))
                })?;
        }

        let rows: Vec<(ContentChunk, Embedding)> = chunks.into_iter().zip(embeddings).collect();

        let written = self.chunk_repository.save_batch(&rows).await?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeEmbeddingProvider, InMemoryChunkRepository};

    fn service(
        provider: FakeEmbeddingProvider,
        repository: Arc<InMemoryChunkRepository>,
    ) -> DocumentProcessorService {
        let dimension = provider.dimension();
        DocumentProcessorService::new(Arc::new(provider), repository, dimension)
    }

    #[test]
    fn test_split_on_second_level_headings() {
        let chunks = split_markdown_sections("A\n## B\n## C");
        let texts: Vec<&str> = chunks.iter().map(|c| c.chunk_text()).collect();

        assert_eq!(texts, vec!["A", "B", "C"]);
        assert_eq!(chunks[2].chunk_index(), 2);
    }

    #[test]
    fn test_split_count_is_delimiters_plus_one() {
        let documents = [
            "",
            "no headings at all",
            "\n## leading heading",
            "# Title\n\n## One\ntext\n## Two\n### Three is not a split\n## Four",
            "trailing\n## ",
            "back to back\n## \n## ",
        ];

        for document in documents {
            let delimiters = document.matches(CHUNK_DELIMITER).count();
            assert_eq!(split_markdown_sections(document).len(), delimiters + 1, "{:?}", document);
        }
    }

    #[test]
    fn test_split_keeps_empty_fragments() {
        let chunks = split_markdown_sections("\n## A");

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chunk_text(), "");
        assert_eq!(chunks[1].chunk_text(), "A");
    }

    #[tokio::test]
    async fn test_embed_chunks_sends_one_tagged_batch() {
        let provider = FakeEmbeddingProvider::new(8);
        let calls = provider.calls();
        let repository = Arc::new(InMemoryChunkRepository::new());
        let service = service(provider, repository);

        let chunks = service.split_document("intro\n## Install\n## Usage");
        let embeddings = service.embed_chunks(&chunks).await.unwrap();

        assert_eq!(embeddings.len(), 3);
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            vec![
                "search_document: intro".to_string(),
                "search_document: Install".to_string(),
                "search_document: Usage".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_store_chunks_round_trip_count() {
        let repository = Arc::new(InMemoryChunkRepository::new());
        repository.reset_schema(8).await.unwrap();
        let service = service(FakeEmbeddingProvider::new(8), repository.clone());

        let chunks = service.split_document("a\n## b\n## c\n## d");
        let embeddings = service.embed_chunks(&chunks).await.unwrap();
        let written = service.store_chunks(chunks, embeddings).await.unwrap();

        assert_eq!(written, 4);
        assert_eq!(repository.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_short_embedding_batch_is_rejected() {
        let repository = Arc::new(InMemoryChunkRepository::new());
        repository.reset_schema(8).await.unwrap();
        let service = service(
            FakeEmbeddingProvider::new(8).dropping_last(),
            repository.clone(),
        );

        let chunks = service.split_document("A\n## B\n## C");
        let embeddings = service.embed_chunks(&chunks).await.unwrap();
        assert_eq!(embeddings.len(), 2);

        let result = service.store_chunks(chunks, embeddings).await;

        assert!(matches!(result, Err(DocumentProcessingError::SchemaMismatch(_))));
        assert_eq!(repository.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_wrong_dimension_is_rejected_before_writing() {
        let repository = Arc::new(InMemoryChunkRepository::new());
        repository.reset_schema(768).await.unwrap();
        let service = DocumentProcessorService::new(
            Arc::new(FakeEmbeddingProvider::new(4)),
            repository.clone(),
            768,
        );

        let chunks = service.split_document("A\n## B");
        let embeddings = service.embed_chunks(&chunks).await.unwrap();
        let error = service.store_chunks(chunks, embeddings).await.unwrap_err();

        assert_eq!(
            error.to_string(),
            "Schema mismatch: chunk 0: expected 768 dimensions, got 4"
        );
        assert_eq!(repository.count().await.unwrap(), 0);
    }
}
