//! Port traits (interfaces) for dependency injection

pub mod cache;
pub mod source;
pub mod store;

pub use cache::{CacheBackend, CacheStats};
pub use source::RecipeSource;
pub use store::RecipeStore;
