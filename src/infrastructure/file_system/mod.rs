pub mod cached_document_source;

pub use cached_document_source::CachedDocumentSource;
