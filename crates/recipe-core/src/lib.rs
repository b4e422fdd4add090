//! Recipe Core Library
//!
//! Ports (storage, external source, cache backend), the TheMealDB record
//! transformation, the search result cache policy and the search
//! orchestrator that merges local and external results.

// Re-export pure types from recipe-types
pub use recipe_types::*;

pub mod cache;
pub mod error;
pub mod mealdb;
pub mod ports;
pub mod search;
pub mod seed;

pub use cache::{cache_key, ResultCache, SEARCH_CACHE_TTL};
pub use error::{CacheError, RecipeError, Result, SourceError};
pub use search::SearchService;
