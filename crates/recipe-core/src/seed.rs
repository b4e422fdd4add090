//! Starter recipes for an empty store

use crate::ports::RecipeStore;
use crate::Result;
use recipe_types::{Difficulty, RecipeDraft};
use tracing::info;

fn draft(
    title: &str,
    ingredients: &[&str],
    steps: &[&str],
    prep_time: &str,
    cook_time: &str,
    cuisine: &str,
) -> RecipeDraft {
    RecipeDraft {
        title: title.to_string(),
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        steps: steps.iter().map(|s| s.to_string()).collect(),
        prep_time: prep_time.to_string(),
        cook_time: cook_time.to_string(),
        difficulty: Difficulty::Easy,
        cuisine: cuisine.to_string(),
    }
}

pub fn seed_recipes() -> Vec<RecipeDraft> {
    vec![
        draft(
            "Garlic Shrimp Pasta",
            &["shrimp", "pasta", "garlic", "olive oil", "lemon"],
            &["Boil pasta", "Saute garlic and shrimp", "Toss together"],
            "10 minutes",
            "15 minutes",
            "Italian",
        ),
        draft(
            "Chicken Rice Bowl",
            &["chicken", "rice", "soy sauce", "green onion"],
            &["Cook rice", "Pan sear chicken", "Slice and serve"],
            "15 minutes",
            "20 minutes",
            "Asian",
        ),
        draft(
            "Simple Salad",
            &["lettuce", "tomato", "cucumber", "olive oil"],
            &["Chop veggies", "Dress and toss"],
            "5 minutes",
            "0 minutes",
            "Mediterranean",
        ),
    ]
}

/// Insert the starter recipes if the store holds none. Returns how many were added.
pub async fn seed_if_empty(store: &dyn RecipeStore) -> Result<usize> {
    if !store.list_recipes().await?.is_empty() {
        return Ok(0);
    }

    let drafts = seed_recipes();
    let count = drafts.len();
    for draft in drafts {
        store.create_recipe(draft).await?;
    }
    info!("Seeded store with {} recipes", count);

    Ok(count)
}
