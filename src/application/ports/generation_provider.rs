use async_trait::async_trait;

#[derive(Debug)]
pub enum GenerationProviderError {
    NetworkError(String),
    ApiError(String),
    ServiceUnavailable,
}

impl std::fmt::Display for GenerationProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationProviderError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            GenerationProviderError::ApiError(msg) => write!(f, "API error: {}", msg),
            GenerationProviderError::ServiceUnavailable => write!(f, "Service unavailable"),
        }
    }
}

impl std::error::Error for GenerationProviderError {}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GenerationResponse {
    pub text: String,
    pub model_name: String,
    pub eval_count: Option<u64>,
}

#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationProviderError>;

    fn model_info(&self) -> String;
}
