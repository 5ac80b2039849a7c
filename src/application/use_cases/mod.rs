pub mod answer_question;
pub mod ingest_document;

pub use answer_question::{AnswerQuestionRequest, AnswerQuestionUseCase};
pub use ingest_document::IngestDocumentUseCase;
