use std::sync::Arc;

use crate::application::ports::embedding_provider::{BatchEmbeddingRequest, EmbeddingProvider};
use crate::domain::entities::{Embedding, RetrievedChunk, SearchQuery};
use crate::domain::repositories::ChunkRepository;

pub const QUERY_PREFIX: &str = "search_query: ";

pub const CONTEXT_SEPARATOR: &str = "\n\n";

#[derive(Debug)]
pub enum SearchServiceError {
    EmbeddingError(String),
    RepositoryError(String),
}

impl std::fmt::Display for SearchServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchServiceError::EmbeddingError(msg) => write!(f, "Embedding error: {}", msg),
            SearchServiceError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for SearchServiceError {}

pub struct SearchService {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    chunk_repository: Arc<dyn ChunkRepository>,
    top_k: i64,
}

impl SearchService {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        chunk_repository: Arc<dyn ChunkRepository>,
        top_k: i64,
    ) -> Self {
        Self {
            embedding_provider,
            chunk_repository,
            top_k,
        }
    }

    /// Embeds the tagged query as a single-element batch and keeps the first vector.
    pub async fn embed_query(&self, query: &SearchQuery) -> Result<Embedding, SearchServiceError> {
        let request = BatchEmbeddingRequest {
            texts: vec![query.tagged(QUERY_PREFIX)],
            model_name: Some(self.embedding_provider.model_info()),
        };

        let response = self
            .embedding_provider
            .generate_embeddings(request)
            .await
            .map_err(|e| SearchServiceError::EmbeddingError(e.to_string()))?;

        response
            .embeddings
            .into_iter()
            .next()
            .map(Embedding::new)
            .ok_or_else(|| SearchServiceError::EmbeddingError("No embeddings returned".to_string()))
    }

    pub async fn retrieve(
        &self,
        query_embedding: &Embedding,
    ) -> Result<Vec<RetrievedChunk>, SearchServiceError> {
        let results = self
            .chunk_repository
            .nearest(query_embedding, self.top_k)
            .await
            .map_err(|e| SearchServiceError::RepositoryError(e.to_string()))?;

        tracing::debug!("Retrieved {} chunks (limit {})", results.len(), self.top_k);
        Ok(results)
    }
}

/// Joins retrieved contents nearest first.
pub fn build_context(results: &[RetrievedChunk]) -> String {
    results
        .iter()
        .map(|result| result.content.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}
