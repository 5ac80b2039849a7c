use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use pgvector::VectorExpressionMethods;
use tokio::sync::Mutex;

use crate::domain::entities::{ContentChunk, Embedding, RetrievedChunk};
use crate::domain::repositories::{ChunkRepository, chunk_repository::ChunkRepositoryError};
use crate::infrastructure::database::models::NewChunkModel;
use crate::infrastructure::database::schema::chunks::dsl::*;

/// Repository over the one connection opened for the run.
pub struct PostgresChunkRepository {
    conn: Mutex<PgConnection>,
}

impl PostgresChunkRepository {
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

fn create_table_sql(if_not_exists: bool, dimension: usize) -> String {
    format!(
        "CREATE TABLE {}chunks (id bigserial PRIMARY KEY, content text, embedding vector({}))",
        if if_not_exists { "IF NOT EXISTS " } else { "" },
        dimension
    )
}

// pgvector rejects a wrong-length vector with "expected 768 dimensions, not 3".
fn is_dimension_mismatch(message: &str) -> bool {
    message
        .strip_prefix("expected ")
        .and_then(|rest| rest.split_once(" dimensions, not "))
        .is_some_and(|(expected, actual)| {
            expected.parse::<usize>().is_ok() && actual.parse::<usize>().is_ok()
        })
}

fn database_error(e: DieselError) -> ChunkRepositoryError {
    match &e {
        DieselError::DatabaseError(_, info) if is_dimension_mismatch(info.message()) => {
            ChunkRepositoryError::DimensionMismatch(info.message().to_string())
        }
        _ => ChunkRepositoryError::DatabaseError(e.to_string()),
    }
}

#[async_trait]
impl ChunkRepository for PostgresChunkRepository {
    async fn reset_schema(&self, dimension: usize) -> Result<(), ChunkRepositoryError> {
        let mut conn = self.conn.lock().await;

        diesel::sql_query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&mut *conn)
            .map_err(database_error)?;
        diesel::sql_query("DROP TABLE IF EXISTS chunks")
            .execute(&mut *conn)
            .map_err(database_error)?;
        diesel::sql_query(create_table_sql(false, dimension))
            .execute(&mut *conn)
            .map_err(database_error)?;

        Ok(())
    }

    async fn ensure_schema(&self, dimension: usize) -> Result<(), ChunkRepositoryError> {
        let mut conn = self.conn.lock().await;

        diesel::sql_query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&mut *conn)
            .map_err(database_error)?;
        diesel::sql_query(create_table_sql(true, dimension))
            .execute(&mut *conn)
            .map_err(database_error)?;

        Ok(())
    }

    async fn save_batch(
        &self,
        rows: &[(ContentChunk, Embedding)],
    ) -> Result<usize, ChunkRepositoryError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn.lock().await;

        let new_chunks: Vec<NewChunkModel> = rows.iter().map(NewChunkModel::from).collect();

        // COPY chunks (content, embedding) FROM STDIN (FORMAT binary)
        diesel::copy_from(chunks)
            .from_insertable(&new_chunks)
            .execute(&mut *conn)
            .map_err(database_error)
    }

    async fn nearest(
        &self,
        query: &Embedding,
        limit: i64,
    ) -> Result<Vec<RetrievedChunk>, ChunkRepositoryError> {
        let mut conn = self.conn.lock().await;

        // SELECT content, embedding <=> $1 AS distance FROM chunks ORDER BY distance LIMIT $2
        let rows = chunks
            .select((content, embedding.cosine_distance(query.vector().clone())))
            .order(embedding.cosine_distance(query.vector().clone()))
            .limit(limit)
            .load::<(Option<String>, Option<f64>)>(&mut *conn)
            .map_err(database_error)?;

        Ok(rows
            .into_iter()
            .map(|(row_content, distance)| RetrievedChunk {
                content: row_content.unwrap_or_default(),
                distance: distance.unwrap_or(f64::NAN),
            })
            .collect())
    }

    async fn count(&self) -> Result<i64, ChunkRepositoryError> {
        let mut conn = self.conn.lock().await;

        chunks
            .count()
            .get_result(&mut *conn)
            .map_err(database_error)
    }
}
