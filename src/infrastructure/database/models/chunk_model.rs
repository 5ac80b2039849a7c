use diesel::prelude::*;
use pgvector::Vector;

use crate::domain::entities::{ContentChunk, Embedding};
use crate::infrastructure::database::schema::chunks;

/// One row of the bulk `COPY`; every column is always present.
#[derive(Debug, Insertable)]
#[diesel(table_name = chunks)]
#[diesel(treat_none_as_default_value = false)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewChunkModel {
    pub content: String,
    pub embedding: Vector,
}

impl From<&(ContentChunk, Embedding)> for NewChunkModel {
    fn from((chunk, embedding): &(ContentChunk, Embedding)) -> Self {
        Self {
            content: chunk.chunk_text().to_string(),
            embedding: embedding.vector().clone(),
        }
    }
}
