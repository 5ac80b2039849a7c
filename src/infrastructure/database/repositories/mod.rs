pub mod postgres_chunk_repository;

pub use postgres_chunk_repository::PostgresChunkRepository;
