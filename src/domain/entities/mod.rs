pub mod content_chunk;
pub mod embedding;
pub mod search_query;

pub use content_chunk::ContentChunk;
pub use embedding::Embedding;
pub use search_query::{RetrievedChunk, SearchQuery};
