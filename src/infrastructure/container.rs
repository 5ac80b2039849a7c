use std::sync::Arc;

use crate::{
    application::{
        ports::{DocumentSource, EmbeddingProvider, GenerationProvider},
        services::{DocumentProcessorService, SearchService},
        use_cases::{AnswerQuestionUseCase, IngestDocumentUseCase},
    },
    domain::repositories::ChunkRepository,
    infrastructure::{
        config::RagConfig,
        database::{get_database_connection, repositories::PostgresChunkRepository},
        external_services::{InferenceClient, OllamaEmbeddingProvider, OllamaGenerationProvider},
        file_system::CachedDocumentSource,
    },
};

pub struct AppContainer {
    // Repositories
    pub chunk_repository: Arc<dyn ChunkRepository>,

    // External Services
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub generation_provider: Arc<dyn GenerationProvider>,

    // Use Cases
    pub ingest_document_use_case: Arc<IngestDocumentUseCase>,
    pub answer_question_use_case: Arc<AnswerQuestionUseCase>,
}

impl AppContainer {
    /// Connects to the database and wires every component. Fails if the store is unreachable.
    pub fn new(config: &RagConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let conn = get_database_connection(&config.database_url)?;
        println!("Connected to the database successfully!");

        // Create repositories
        let chunk_repository: Arc<dyn ChunkRepository> =
            Arc::new(PostgresChunkRepository::new(conn));

        // Create external services
        let inference_client = InferenceClient::new(config.ollama.clone())
            .map_err(|e| format!("Failed to create Ollama client: {}", e))?;
        let embedding_provider: Arc<dyn EmbeddingProvider> = Arc::new(OllamaEmbeddingProvider::new(
            inference_client.clone(),
            config.embedding_model.clone(),
        ));
        let generation_provider: Arc<dyn GenerationProvider> = Arc::new(
            OllamaGenerationProvider::new(inference_client, config.generation_model.clone()),
        );

        let document_source: Arc<dyn DocumentSource> = Arc::new(CachedDocumentSource::new(
            reqwest::Client::new(),
            config.source_url.clone(),
            config.cache_path.clone(),
        ));

        // Create application services
        let document_processor = Arc::new(DocumentProcessorService::new(
            embedding_provider.clone(),
            chunk_repository.clone(),
            config.embedding_dimension,
        ));
        let search_service = Arc::new(SearchService::new(
            embedding_provider.clone(),
            chunk_repository.clone(),
            config.top_k,
        ));

        // Create use cases
        let ingest_document_use_case = Arc::new(IngestDocumentUseCase::new(
            document_source,
            document_processor,
            chunk_repository.clone(),
            config.embedding_dimension,
            config.reset_table,
        ));
        let answer_question_use_case = Arc::new(AnswerQuestionUseCase::new(
            search_service,
            generation_provider.clone(),
        ));

        Ok(Self {
            chunk_repository,
            embedding_provider,
            generation_provider,
            ingest_document_use_case,
            answer_question_use_case,
        })
    }
}
