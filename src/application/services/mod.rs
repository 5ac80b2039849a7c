pub mod document_processor;
pub mod prompt_builder;
pub mod search_service;

pub use document_processor::DocumentProcessorService;
pub use prompt_builder::PromptBuilder;
pub use search_service::SearchService;
