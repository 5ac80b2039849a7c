use diesel::{Connection, PgConnection};

#[derive(Debug)]
pub enum DatabaseError {
    ConnectionError(String),
}

impl std::fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseError::ConnectionError(msg) => write!(f, "Connection error: {}", msg),
        }
    }
}

impl std::error::Error for DatabaseError {}

/// Opens the single connection used for the whole run. There is no pool and no reconnect.
pub fn get_database_connection(database_url: &str) -> Result<PgConnection, DatabaseError> {
    PgConnection::establish(database_url)
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))
}
