use async_trait::async_trait;

use crate::domain::entities::{ContentChunk, Embedding, RetrievedChunk};

#[derive(Debug)]
pub enum ChunkRepositoryError {
    DatabaseError(String),
    DimensionMismatch(String),
}

impl std::fmt::Display for ChunkRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChunkRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ChunkRepositoryError::DimensionMismatch(msg) => {
                write!(f, "Dimension mismatch: {}", msg)
            }
        }
    }
}

impl std::error::Error for ChunkRepositoryError {}

/// Storage for embedded chunks backed by a single `chunks` table.
#[async_trait]
pub trait ChunkRepository: Send + Sync {
    /// Drops the table if present and recreates it empty with a vector column
    /// of `dimension` floats.
    async fn reset_schema(&self, dimension: usize) -> Result<(), ChunkRepositoryError>;

    /// Creates the table if it is missing; existing rows are kept.
    async fn ensure_schema(&self, dimension: usize) -> Result<(), ChunkRepositoryError>;

    /// Writes all pairs in one bulk statement and returns the number of rows written.
    async fn save_batch(
        &self,
        rows: &[(ContentChunk, Embedding)],
    ) -> Result<usize, ChunkRepositoryError>;

    /// Rows ordered by ascending cosine distance to `query`, at most `limit` of them.
    async fn nearest(
        &self,
        query: &Embedding,
        limit: i64,
    ) -> Result<Vec<RetrievedChunk>, ChunkRepositoryError>;

    async fn count(&self) -> Result<i64, ChunkRepositoryError>;
}
