//! In-memory recipe store

use async_trait::async_trait;
use recipe_core::ports::RecipeStore;
use recipe_core::{Recipe, RecipeDraft, Result};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

struct Inner {
    recipes: BTreeMap<i64, Recipe>,
    next_id: i64,
}

/// Recipes held in a map keyed by id. The id counter lives under the same
/// lock as the map, so concurrent creates never reuse an id.
pub struct MemoryRecipeStore {
    inner: RwLock<Inner>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                recipes: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryRecipeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let inner = self.inner.read().await;
        Ok(inner.recipes.values().cloned().collect())
    }

    async fn get_recipe(&self, id: i64) -> Result<Option<Recipe>> {
        let inner = self.inner.read().await;
        Ok(inner.recipes.get(&id).cloned())
    }

    async fn search_recipes(&self, query: &str) -> Result<Vec<Recipe>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let needle = query.to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner
            .recipes
            .values()
            .filter(|r| r.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn create_recipe(&self, draft: RecipeDraft) -> Result<Recipe> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let recipe = Recipe::from_draft(id, draft);
        inner.recipes.insert(id, recipe.clone());
        Ok(recipe)
    }

    async fn update_recipe(&self, id: i64, draft: RecipeDraft) -> Result<Option<Recipe>> {
        let mut inner = self.inner.write().await;
        match inner.recipes.get_mut(&id) {
            Some(existing) => {
                *existing = Recipe::from_draft(id, draft);
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_recipe(&self, id: i64) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.recipes.remove(&id).is_some())
    }
}
