//! Search orchestration
//!
//! Merges title matches from the local store with results from the external
//! source. External results go through the [`ResultCache`]. Store failures
//! propagate; source and cache failures are logged and degrade to fewer
//! results.

use crate::cache::ResultCache;
use crate::ports::{RecipeSource, RecipeStore};
use crate::Result;
use recipe_types::{Provenance, Recipe};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct SearchService {
    store: Arc<dyn RecipeStore>,
    source: Arc<dyn RecipeSource>,
    cache: ResultCache,
}

impl SearchService {
    pub fn new(
        store: Arc<dyn RecipeStore>,
        source: Arc<dyn RecipeSource>,
        cache: ResultCache,
    ) -> Self {
        Self {
            store,
            source,
            cache,
        }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Local matches (ascending id) followed by external matches (source order)
    pub async fn search(&self, query: &str) -> Result<Vec<Recipe>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let (local, external) =
            tokio::join!(self.store.search_recipes(query), self.external_matches(query));

        let mut results: Vec<Recipe> = local?
            .into_iter()
            .map(|r| r.with_source(Provenance::Internal))
            .collect();
        info!(
            "Search '{}': {} local, {} external",
            query,
            results.len(),
            external.len()
        );
        results.extend(external);

        Ok(results)
    }

    async fn external_matches(&self, query: &str) -> Vec<Recipe> {
        match self.cache.get(query).await {
            Ok(Some(cached)) => {
                debug!("Cache hit for '{}'", query);
                return cached;
            }
            Ok(None) => debug!("Cache miss for '{}'", query),
            Err(e) => warn!("Cache lookup failed for '{}', fetching: {}", query, e),
        }

        let fetched = match self.source.search(query).await {
            Ok(recipes) => recipes,
            Err(e) => {
                warn!(
                    "External source {} failed for '{}': {}",
                    self.source.provenance(),
                    query,
                    e
                );
                return Vec::new();
            }
        };

        if let Err(e) = self.cache.put(query, &fetched).await {
            warn!("Failed to cache results for '{}': {}", query, e);
        }

        fetched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::tests::{external, FakeBackend};
    use crate::cache::cache_key;
    use crate::{RecipeError, SourceError};
    use async_trait::async_trait;
    use recipe_types::{Difficulty, RecipeDraft, RecipeId};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeStore {
        recipes: Mutex<Vec<Recipe>>,
        searches: AtomicUsize,
        down: bool,
    }

    impl FakeStore {
        fn with_titles(titles: &[&str]) -> Self {
            let recipes = titles
                .iter()
                .enumerate()
                .map(|(i, title)| Recipe::from_draft(i as i64 + 1, draft(title)))
                .collect();
            Self {
                recipes: Mutex::new(recipes),
                ..Default::default()
            }
        }
    }

    fn draft(title: &str) -> RecipeDraft {
        RecipeDraft {
            title: title.to_string(),
            ingredients: vec!["garlic".to_string()],
            steps: vec!["Cook it".to_string()],
            prep_time: "10 minutes".to_string(),
            cook_time: "15 minutes".to_string(),
            difficulty: Difficulty::Easy,
            cuisine: "Italian".to_string(),
        }
    }

    #[async_trait]
    impl RecipeStore for FakeStore {
        async fn list_recipes(&self) -> Result<Vec<Recipe>> {
            Ok(self.recipes.lock().unwrap().clone())
        }

        async fn get_recipe(&self, id: i64) -> Result<Option<Recipe>> {
            Ok(self
                .recipes
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == RecipeId::Local(id))
                .cloned())
        }

        async fn search_recipes(&self, query: &str) -> Result<Vec<Recipe>> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            if self.down {
                return Err(RecipeError::Storage("database is locked".to_string()));
            }
            let needle = query.to_lowercase();
            Ok(self
                .recipes
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.title.to_lowercase().contains(&needle))
                .cloned()
                .collect())
        }

        async fn create_recipe(&self, draft: RecipeDraft) -> Result<Recipe> {
            let mut recipes = self.recipes.lock().unwrap();
            let recipe = Recipe::from_draft(recipes.len() as i64 + 1, draft);
            recipes.push(recipe.clone());
            Ok(recipe)
        }

        async fn update_recipe(&self, _id: i64, _draft: RecipeDraft) -> Result<Option<Recipe>> {
            Ok(None)
        }

        async fn delete_recipe(&self, _id: i64) -> Result<bool> {
            Ok(false)
        }
    }

    struct FakeSource {
        results: Vec<Recipe>,
        calls: AtomicUsize,
        failing: bool,
    }

    impl FakeSource {
        fn returning(results: Vec<Recipe>) -> Self {
            Self {
                results,
                calls: AtomicUsize::new(0),
                failing: false,
            }
        }

        fn failing() -> Self {
            Self {
                results: Vec::new(),
                calls: AtomicUsize::new(0),
                failing: true,
            }
        }
    }

    #[async_trait]
    impl RecipeSource for FakeSource {
        fn provenance(&self) -> Provenance {
            Provenance::MealDb
        }

        async fn search(&self, _query: &str) -> std::result::Result<Vec<Recipe>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing {
                return Err(SourceError::Transport("timed out".to_string()));
            }
            Ok(self.results.clone())
        }
    }

    struct Fixture {
        store: Arc<FakeStore>,
        source: Arc<FakeSource>,
        backend: Arc<FakeBackend>,
        service: SearchService,
    }

    fn fixture(store: FakeStore, source: FakeSource, backend: FakeBackend) -> Fixture {
        let store = Arc::new(store);
        let source = Arc::new(source);
        let backend = Arc::new(backend);
        let service = SearchService::new(
            store.clone(),
            source.clone(),
            ResultCache::new(backend.clone()),
        );
        Fixture {
            store,
            source,
            backend,
            service,
        }
    }

    fn titles(results: &[Recipe]) -> Vec<&str> {
        results.iter().map(|r| r.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_blank_query_touches_nothing() {
        let f = fixture(
            FakeStore::with_titles(&["Garlic Shrimp Pasta"]),
            FakeSource::returning(vec![external("1", "Pasta Carbonara")]),
            FakeBackend::default(),
        );

        for query in ["", "   ", "\t\n"] {
            assert!(f.service.search(query).await.unwrap().is_empty());
        }
        assert_eq!(f.store.searches.load(Ordering::SeqCst), 0);
        assert_eq!(f.source.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.backend.gets.load(Ordering::SeqCst), 0);
        assert_eq!(f.backend.sets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_local_then_external() {
        let f = fixture(
            FakeStore::with_titles(&["Garlic Shrimp Pasta", "Chicken Rice Bowl", "Pasta Salad"]),
            FakeSource::returning(vec![
                external("52982", "Spaghetti alla Carbonara"),
                external("52771", "Pasta Carbonara"),
            ]),
            FakeBackend::default(),
        );

        let results = f.service.search("pasta").await.unwrap();
        assert_eq!(
            titles(&results),
            vec![
                "Garlic Shrimp Pasta",
                "Pasta Salad",
                "Spaghetti alla Carbonara",
                "Pasta Carbonara"
            ]
        );
        assert_eq!(results[0].id, RecipeId::Local(1));
        assert_eq!(results[1].id, RecipeId::Local(3));
        assert_eq!(results[0].source, Some(Provenance::Internal));
        assert_eq!(results[1].source, Some(Provenance::Internal));
        assert_eq!(results[2].source, Some(Provenance::MealDb));
        assert_eq!(results[3].source, Some(Provenance::MealDb));
    }

    #[tokio::test]
    async fn test_case_insensitive_local_matches() {
        let f = fixture(
            FakeStore::with_titles(&["Garlic Shrimp Pasta", "Simple Salad"]),
            FakeSource::returning(Vec::new()),
            FakeBackend::default(),
        );

        let upper = f.service.search("PASTA").await.unwrap();
        let lower = f.service.search("pasta").await.unwrap();
        assert_eq!(upper, lower);
        assert_eq!(titles(&upper), vec!["Garlic Shrimp Pasta"]);
    }

    #[tokio::test]
    async fn test_warm_cache_skips_source() {
        let f = fixture(
            FakeStore::with_titles(&["Garlic Shrimp Pasta"]),
            FakeSource::returning(vec![external("52771", "Pasta Carbonara")]),
            FakeBackend::default(),
        );

        let first = f.service.search("Pasta").await.unwrap();
        let second = f.service.search(" pasta ").await.unwrap();
        assert_eq!(f.source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.len(), 2);

        let third = f.service.search(" pasta ").await.unwrap();
        assert_eq!(second, third);
        assert!(f
            .backend
            .entries
            .lock()
            .unwrap()
            .contains_key(&cache_key("pasta")));
    }

    #[tokio::test]
    async fn test_source_failure_degrades() {
        let f = fixture(
            FakeStore::with_titles(&["Garlic Shrimp Pasta"]),
            FakeSource::failing(),
            FakeBackend::default(),
        );

        let results = f.service.search("pasta").await.unwrap();
        assert_eq!(titles(&results), vec!["Garlic Shrimp Pasta"]);
        // failures are not cached
        assert_eq!(f.backend.sets.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cache_failure_falls_back_to_source() {
        let f = fixture(
            FakeStore::default(),
            FakeSource::returning(vec![external("52771", "Pasta Carbonara")]),
            FakeBackend::broken(),
        );

        let results = f.service.search("pasta").await.unwrap();
        assert_eq!(titles(&results), vec!["Pasta Carbonara"]);
        assert_eq!(f.source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.backend.sets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_is_a_miss() {
        let backend = FakeBackend::default();
        backend
            .entries
            .lock()
            .unwrap()
            .insert(cache_key("pasta"), "[{\"broken\":".to_string());
        let f = fixture(
            FakeStore::default(),
            FakeSource::returning(vec![external("52771", "Pasta Carbonara")]),
            backend,
        );

        let results = f.service.search("pasta").await.unwrap();
        assert_eq!(titles(&results), vec!["Pasta Carbonara"]);
        assert_eq!(f.source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = FakeStore {
            down: true,
            ..Default::default()
        };
        let f = fixture(
            store,
            FakeSource::returning(vec![external("52771", "Pasta Carbonara")]),
            FakeBackend::default(),
        );

        let result = f.service.search("pasta").await;
        assert!(matches!(result, Err(RecipeError::Storage(_))));
    }

    #[tokio::test]
    async fn test_no_cross_source_dedup() {
        let f = fixture(
            FakeStore::with_titles(&["Pasta Carbonara"]),
            FakeSource::returning(vec![external("52771", "Pasta Carbonara")]),
            FakeBackend::default(),
        );

        let results = f.service.search("carbonara").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].source, Some(Provenance::Internal));
        assert_eq!(results[1].source, Some(Provenance::MealDb));
    }
}
