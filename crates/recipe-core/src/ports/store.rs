//! Storage trait for locally owned recipes

use crate::Result;
use async_trait::async_trait;
use recipe_types::{Recipe, RecipeDraft};

/// Recipe store
///
/// Implementations assign unique, monotonically increasing ids on create and
/// return records ordered by ascending id. Returned records carry no
/// provenance.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn list_recipes(&self) -> Result<Vec<Recipe>>;
    async fn get_recipe(&self, id: i64) -> Result<Option<Recipe>>;
    /// Case-insensitive title substring search. Blank queries match nothing.
    async fn search_recipes(&self, query: &str) -> Result<Vec<Recipe>>;
    async fn create_recipe(&self, draft: RecipeDraft) -> Result<Recipe>;
    /// Replace every field but the id. `None` if the id is unknown.
    async fn update_recipe(&self, id: i64, draft: RecipeDraft) -> Result<Option<Recipe>>;
    /// `false` if the id is unknown.
    async fn delete_recipe(&self, id: i64) -> Result<bool>;
}
