use std::sync::Arc;

use crate::application::ports::{GenerationProvider, generation_provider::GenerationRequest};
use crate::application::services::{PromptBuilder, SearchService, search_service::build_context};
use crate::domain::entities::{RetrievedChunk, SearchQuery};

#[derive(Debug)]
pub enum AnswerQuestionError {
    ValidationError(String),
    SearchError(String),
    GenerationError(String),
}

impl std::fmt::Display for AnswerQuestionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerQuestionError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AnswerQuestionError::SearchError(msg) => write!(f, "Search error: {}", msg),
            AnswerQuestionError::GenerationError(msg) => write!(f, "Generation error: {}", msg),
        }
    }
}

impl std::error::Error for AnswerQuestionError {}

#[derive(Debug, Clone)]
pub struct AnswerQuestionRequest {
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct AnswerReport {
    pub query: String,
    pub retrieved: Vec<RetrievedChunk>,
    pub answer: String,
}

pub struct AnswerQuestionUseCase {
    search_service: Arc<SearchService>,
    generation_provider: Arc<dyn GenerationProvider>,
}

impl AnswerQuestionUseCase {
    pub fn new(
        search_service: Arc<SearchService>,
        generation_provider: Arc<dyn GenerationProvider>,
    ) -> Self {
        Self {
            search_service,
            generation_provider,
        }
    }

    pub async fn execute(
        &self,
        request: AnswerQuestionRequest,
    ) -> Result<AnswerReport, AnswerQuestionError> {
        let query = SearchQuery::new(request.query);
        if query.is_empty_query() {
            return Err(AnswerQuestionError::ValidationError(
                "Query cannot be empty".to_string(),
            ));
        }

        let query_embedding = self
            .search_service
            .embed_query(&query)
            .await
            .map_err(|e| AnswerQuestionError::SearchError(e.to_string()))?;
        println!("Generated query embedding.");

        let retrieved = self
            .search_service
            .retrieve(&query_embedding)
            .await
            .map_err(|e| AnswerQuestionError::SearchError(e.to_string()))?;

        let context = build_context(&retrieved);
        let prompt = PromptBuilder::answer_prompt(query.query_text(), &context);

        let response = self
            .generation_provider
            .generate(GenerationRequest {
                prompt,
                model_name: Some(self.generation_provider.model_info()),
            })
            .await
            .map_err(|e| AnswerQuestionError::GenerationError(e.to_string()))?;

        tracing::debug!(
            "Model {} answered ({:?} tokens evaluated)",
            response.model_name,
            response.eval_count
        );

        Ok(AnswerReport {
            query: query.query_text().to_string(),
            retrieved,
            answer: response.text,
        })
    }
}
