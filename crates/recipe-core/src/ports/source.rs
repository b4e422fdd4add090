//! External recipe source

use crate::SourceError;
use async_trait::async_trait;
use recipe_types::{Provenance, Recipe};

#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Provenance tag stamped on every recipe this source returns
    fn provenance(&self) -> Provenance;

    /// Look up recipes by free-text name. The query is passed through as
    /// the caller typed it.
    async fn search(&self, query: &str) -> std::result::Result<Vec<Recipe>, SourceError>;
}
