pub mod connection;
pub mod models;
pub mod repositories;
pub mod schema;

pub use connection::get_database_connection;
