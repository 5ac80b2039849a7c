pub mod chunk_model;

pub use chunk_model::*;
