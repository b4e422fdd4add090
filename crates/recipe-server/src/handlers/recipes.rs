//! Recipe handlers

use super::error_status;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use recipe_core::{Recipe, RecipeDraft, RecipeError};
use serde::Deserialize;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Recipe>>, StatusCode> {
    let recipes = state
        .store
        .list_recipes()
        .await
        .map_err(|e| error_status("Failed to list recipes", e))?;

    Ok(Json(recipes))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Recipe>, StatusCode> {
    let recipe = state
        .store
        .get_recipe(id)
        .await
        .and_then(|r| r.ok_or(RecipeError::NotFound(id)))
        .map_err(|e| error_status("Failed to get recipe", e))?;

    Ok(Json(recipe))
}

pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<RecipeDraft>,
) -> Result<(StatusCode, Json<Recipe>), StatusCode> {
    let recipe = state
        .store
        .create_recipe(draft)
        .await
        .map_err(|e| error_status("Failed to create recipe", e))?;

    tracing::info!("Created recipe {}: {}", recipe.id, recipe.title);
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<RecipeDraft>,
) -> Result<Json<Recipe>, StatusCode> {
    let recipe = state
        .store
        .update_recipe(id, draft)
        .await
        .and_then(|r| r.ok_or(RecipeError::NotFound(id)))
        .map_err(|e| error_status("Failed to update recipe", e))?;

    Ok(Json(recipe))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    match state.store.delete_recipe(id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => Err(error_status("Failed to delete recipe", e)),
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Recipe>>, StatusCode> {
    let results = state
        .search
        .search(&params.q)
        .await
        .map_err(|e| error_status("Search failed", e))?;

    Ok(Json(results))
}
