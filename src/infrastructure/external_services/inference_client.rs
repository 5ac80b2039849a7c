use async_trait::async_trait;
use pgvector::Vector;
use reqwest::{Client, Error as ReqwestError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::embedding_provider::{
    BatchEmbeddingRequest, BatchEmbeddingResponse, EmbeddingProvider, EmbeddingProviderError,
};
use crate::application::ports::generation_provider::{
    GenerationProvider, GenerationProviderError, GenerationRequest, GenerationResponse,
};
use crate::infrastructure::config::OllamaClientConfig;

/// `/api/embed` body. Input is always sent as an array, even for one text.
#[derive(Serialize)]
pub struct EmbedRequest {
    pub model: String,
    pub input: Vec<String>,
}

#[derive(Deserialize)]
pub struct EmbedResponse {
    #[serde(default)]
    pub model: Option<String>,
    pub embeddings: Vec<Vector>,
}

#[derive(Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

#[derive(Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub model: Option<String>,
    pub response: String,
    #[serde(default)]
    pub eval_count: Option<u64>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub enum InferenceError {
    RequestError(String),
    ApiError { status: u16, message: String },
    ParseError(String),
    MaxRetriesExceeded(String),
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceError::RequestError(msg) => write!(f, "Request error: {}", msg),
            InferenceError::ApiError { status, message } => {
                write!(f, "Ollama returned {}: {}", status, message)
            }
            InferenceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            InferenceError::MaxRetriesExceeded(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for InferenceError {}

/// Thin client for the Ollama HTTP API (`/api/embed`, `/api/generate`).
#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: Client,
    config: OllamaClientConfig,
}

impl InferenceClient {
    pub fn new(config: OllamaClientConfig) -> Result<Self, ReqwestError> {
        let mut builder = Client::builder();
        if let Some(timeout_secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    pub async fn embed(&self, model: &str, input: Vec<String>) -> Result<EmbedResponse, InferenceError> {
        let request = EmbedRequest {
            model: model.to_string(),
            input,
        };

        self.send_request("api/embed", &request).await
    }

    pub async fn generate(&self, model: &str, prompt: &str) -> Result<GenerateResponse, InferenceError> {
        let request = GenerateRequest {
            model: model.to_string(),
            prompt: prompt.to_string(),
            stream: false,
        };

        self.send_request("api/generate", &request).await
    }

    async fn send_request<B, R>(&self, path: &str, request: &B) -> Result<R, InferenceError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.execute_request(path, request).await {
                Ok(response) => return Ok(response),
                // Only transport failures are worth repeating; API errors such as
                // a missing model will not change between attempts.
                Err(InferenceError::RequestError(msg)) if attempts <= self.config.max_retries => {
                    let backoff_time = Duration::from_millis(
                        (self.config.backoff_factor.powi(attempts as i32 - 1) * 1000.0) as u64,
                    );
                    tracing::warn!(
                        "Ollama request to {} failed ({}), retrying in {} ms",
                        path,
                        msg,
                        backoff_time.as_millis()
                    );

                    tokio::time::sleep(backoff_time).await;
                }
                Err(InferenceError::RequestError(msg)) if self.config.max_retries > 0 => {
                    return Err(InferenceError::MaxRetriesExceeded(format!(
                        "Max retries exceeded: {}",
                        msg
                    )));
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn execute_request<B, R>(&self, path: &str, request: &B) -> Result<R, InferenceError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self
            .config
            .base_url
            .join(path)
            .map_err(|e| InferenceError::RequestError(format!("Invalid URL: {}", e)))?;

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| InferenceError::RequestError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|error_body| error_body.error)
                .unwrap_or(body);

            return Err(InferenceError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| InferenceError::ParseError(e.to_string()))
    }
}

fn embedding_error(error: InferenceError) -> EmbeddingProviderError {
    match error {
        InferenceError::RequestError(msg) => EmbeddingProviderError::NetworkError(msg),
        InferenceError::ApiError { .. } | InferenceError::ParseError(_) => {
            EmbeddingProviderError::ApiError(error.to_string())
        }
        InferenceError::MaxRetriesExceeded(_) => EmbeddingProviderError::ServiceUnavailable,
    }
}

fn generation_error(error: InferenceError) -> GenerationProviderError {
    match error {
        InferenceError::RequestError(msg) => GenerationProviderError::NetworkError(msg),
        InferenceError::ApiError { .. } | InferenceError::ParseError(_) => {
            GenerationProviderError::ApiError(error.to_string())
        }
        InferenceError::MaxRetriesExceeded(_) => GenerationProviderError::ServiceUnavailable,
    }
}

// Adapter to implement the EmbeddingProvider trait
pub struct OllamaEmbeddingProvider {
    client: InferenceClient,
    model: String,
}

impl OllamaEmbeddingProvider {
    pub fn new(client: InferenceClient, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn generate_embeddings(
        &self,
        request: BatchEmbeddingRequest,
    ) -> Result<BatchEmbeddingResponse, EmbeddingProviderError> {
        if request.texts.is_empty() {
            return Err(EmbeddingProviderError::InvalidInput(
                "Cannot embed an empty batch".to_string(),
            ));
        }

        let model = request.model_name.unwrap_or_else(|| self.model.clone());
        let response = self
            .client
            .embed(&model, request.texts)
            .await
            .map_err(embedding_error)?;

        Ok(BatchEmbeddingResponse {
            embeddings: response.embeddings,
            model_name: response.model.unwrap_or(model),
        })
    }

    fn model_info(&self) -> String {
        self.model.clone()
    }
}

pub struct OllamaGenerationProvider {
    client: InferenceClient,
    model: String,
}

impl OllamaGenerationProvider {
    pub fn new(client: InferenceClient, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl GenerationProvider for OllamaGenerationProvider {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationProviderError> {
        let model = request.model_name.unwrap_or_else(|| self.model.clone());
        let response = self
            .client
            .generate(&model, &request.prompt)
            .await
            .map_err(generation_error)?;

        Ok(GenerationResponse {
            text: response.response,
            model_name: response.model.unwrap_or(model),
            eval_count: response.eval_count,
        })
    }

    fn model_info(&self) -> String {
        self.model.clone()
    }
}
