//! HTTP handlers

pub mod cache;
pub mod health;
pub mod recipes;

pub use health::{health, ping};

use axum::http::StatusCode;
use recipe_core::RecipeError;

/// Map a store error onto a response status, logging anything server-side
pub(crate) fn error_status(context: &str, e: RecipeError) -> StatusCode {
    match e {
        RecipeError::NotFound(_) => StatusCode::NOT_FOUND,
        e => {
            tracing::error!("{}: {}", context, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
