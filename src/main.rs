mod application;
mod domain;
mod infrastructure;

#[cfg(test)]
mod testing;

use application::use_cases::AnswerQuestionRequest;
use infrastructure::{AppContainer, RagConfig};

// Requires a running Ollama with the models pulled:
//   ollama pull nomic-embed-text
//   ollama pull llama3.2
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = RagConfig::from_env()?;
    let container = AppContainer::new(&config)?;
    tracing::debug!(
        "Embedding with {}, generating with {}",
        container.embedding_provider.model_info(),
        container.generation_provider.model_info()
    );

    let ingest = container.ingest_document_use_case.execute().await?;
    let stored = container.chunk_repository.count().await?;
    tracing::info!(
        "Indexed {} ({} chunks, {} embeddings, {} rows written, {} rows in table)",
        ingest.document_name,
        ingest.chunk_count,
        ingest.embedding_count,
        ingest.rows_copied,
        stored
    );

    let report = container
        .answer_question_use_case
        .execute(AnswerQuestionRequest {
            query: config.query.clone(),
        })
        .await?;
    tracing::info!(
        "Answered {:?} from {} retrieved chunks",
        report.query,
        report.retrieved.len()
    );

    println!("{}", report.answer);

    Ok(())
}
