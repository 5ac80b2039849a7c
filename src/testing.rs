//! In-memory stand-ins for the ports, shared by the unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pgvector::Vector;

use crate::application::ports::document_source::{
    DocumentSource, DocumentSourceError, SourceDocument,
};
use crate::application::ports::embedding_provider::{
    BatchEmbeddingRequest, BatchEmbeddingResponse, EmbeddingProvider, EmbeddingProviderError,
};
use crate::application::ports::generation_provider::{
    GenerationProvider, GenerationProviderError, GenerationRequest, GenerationResponse,
};
use crate::domain::entities::{ContentChunk, Embedding, RetrievedChunk};
use crate::domain::repositories::{ChunkRepository, chunk_repository::ChunkRepositoryError};

/// Bag-of-bytes embeddings. Text before the first `": "` is treated as the
/// task prefix and ignored, so a query equal to a chunk lands at distance 0.
pub struct FakeEmbeddingProvider {
    dimension: usize,
    drop_last: bool,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl FakeEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            drop_last: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Misbehaves by returning one embedding fewer than requested.
    pub fn dropping_last(mut self) -> Self {
        self.drop_last = true;
        self
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<Vec<String>>>> {
        self.calls.clone()
    }

    pub fn embed_text(&self, text: &str) -> Embedding {
        Embedding::new(self.vector_for(text))
    }

    fn vector_for(&self, text: &str) -> Vector {
        let body = text.split_once(": ").map(|(_, rest)| rest).unwrap_or(text);
        let mut values = vec![0.0f32; self.dimension];
        values[0] = 1.0;
        for byte in body.bytes() {
            values[byte as usize % self.dimension] += 1.0;
        }
        Vector::from(values)
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbeddingProvider {
    async fn generate_embeddings(
        &self,
        request: BatchEmbeddingRequest,
    ) -> Result<BatchEmbeddingResponse, EmbeddingProviderError> {
        self.calls.lock().unwrap().push(request.texts.clone());

        let mut embeddings: Vec<Vector> = request
            .texts
            .iter()
            .map(|text| self.vector_for(text))
            .collect();
        if self.drop_last {
            embeddings.pop();
        }

        Ok(BatchEmbeddingResponse {
            embeddings,
            model_name: self.model_info(),
        })
    }

    fn model_info(&self) -> String {
        "fake-embed".to_string()
    }
}

/// Records every prompt and answers with a fixed string.
pub struct FakeGenerationProvider {
    answer: String,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeGenerationProvider {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        self.prompts.clone()
    }
}

#[async_trait]
impl GenerationProvider for FakeGenerationProvider {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationProviderError> {
        self.prompts.lock().unwrap().push(request.prompt);
        Ok(GenerationResponse {
            text: self.answer.clone(),
            model_name: self.model_info(),
            eval_count: None,
        })
    }

    fn model_info(&self) -> String {
        "fake-generate".to_string()
    }
}

pub struct StaticDocumentSource {
    text: String,
}

impl StaticDocumentSource {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[async_trait]
impl DocumentSource for StaticDocumentSource {
    async fn load_document(&self) -> Result<SourceDocument, DocumentSourceError> {
        Ok(SourceDocument {
            name: "README.md".to_string(),
            text: self.text.clone(),
            downloaded: false,
        })
    }
}

/// Same quantity as pgvector's `<=>` operator.
fn cosine_distance(a: &[f32], b: &[f32]) -> Result<f64, String> {
    if a.len() != b.len() {
        return Err(format!("different vector dimensions {} and {}", a.len(), b.len()));
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm_a = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Err("cannot compare a zero vector".to_string());
    }

    Ok(1.0 - dot / (norm_a * norm_b))
}

#[derive(Default)]
struct TableState {
    dimension: Option<usize>,
    rows: Vec<(String, Embedding)>,
}

/// Mirrors the `chunks` table: the dimension is fixed when the table is created
/// and inserts are all-or-nothing.
#[derive(Default)]
pub struct InMemoryChunkRepository {
    state: Mutex<TableState>,
}

impl InMemoryChunkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChunkRepository for InMemoryChunkRepository {
    async fn reset_schema(&self, dimension: usize) -> Result<(), ChunkRepositoryError> {
        let mut state = self.state.lock().unwrap();
        state.dimension = Some(dimension);
        state.rows.clear();
        Ok(())
    }

    async fn ensure_schema(&self, dimension: usize) -> Result<(), ChunkRepositoryError> {
        let mut state = self.state.lock().unwrap();
        if state.dimension.is_none() {
            state.dimension = Some(dimension);
        }
        Ok(())
    }

    async fn save_batch(
        &self,
        rows: &[(ContentChunk, Embedding)],
    ) -> Result<usize, ChunkRepositoryError> {
        let mut state = self.state.lock().unwrap();
        let dimension = state.dimension.ok_or_else(|| {
            ChunkRepositoryError::DatabaseError("relation \"chunks\" does not exist".to_string())
        })?;

        for (_, embedding) in rows {
            embedding
                .ensure_dimension(dimension)
                .map_err(ChunkRepositoryError::DimensionMismatch)?;
        }

        state.rows.extend(
            rows.iter()
                .map(|(chunk, embedding)| (chunk.chunk_text().to_string(), embedding.clone())),
        );
        Ok(rows.len())
    }

    async fn nearest(
        &self,
        query: &Embedding,
        limit: i64,
    ) -> Result<Vec<RetrievedChunk>, ChunkRepositoryError> {
        let state = self.state.lock().unwrap();

        let mut results = Vec::new();
        for (content, embedding) in &state.rows {
            let distance = cosine_distance(embedding.as_slice(), query.as_slice())
                .map_err(ChunkRepositoryError::DimensionMismatch)?;
            results.push(RetrievedChunk {
                content: content.clone(),
                distance,
            });
        }

        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results.truncate(limit.max(0) as usize);
        Ok(results)
    }

    async fn count(&self) -> Result<i64, ChunkRepositoryError> {
        Ok(self.state.lock().unwrap().rows.len() as i64)
    }
}
