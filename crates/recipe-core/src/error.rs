//! Error types for the recipe catalog

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecipeError>;

#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Recipe not found: {0}")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for RecipeError {
    fn from(e: serde_json::Error) -> Self {
        RecipeError::Serialization(e.to_string())
    }
}

/// Failures talking to an external recipe source. Never surfaced as a
/// [`RecipeError`]; search degrades them to an empty external leg.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected status: {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Failures talking to the cache backend
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    #[error("Cache serialization error: {0}")]
    Serialization(String),

    #[error("Cache backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        CacheError::Serialization(e.to_string())
    }
}
