pub mod config;
pub mod container;
pub mod database;
pub mod external_services;
pub mod file_system;

// Re-export commonly used items
pub use config::RagConfig;
pub use container::AppContainer;
