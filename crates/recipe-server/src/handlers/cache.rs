//! Cache administration handlers

use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    /// Backend counters, `{}` when the backend is unreachable
    cache_stats: serde_json::Value,
    message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    message: &'static str,
}

pub async fn stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let cache_stats = state
        .search
        .cache()
        .stats()
        .await
        .and_then(|stats| serde_json::to_value(stats).ok())
        .unwrap_or_else(|| serde_json::json!({}));

    Json(CacheStatsResponse {
        cache_stats,
        message: "Cache statistics retrieved successfully",
    })
}

/// Flushes the whole backing database, not only search entries.
pub async fn clear(State(state): State<AppState>) -> Result<Json<MessageResponse>, StatusCode> {
    match state.search.cache().clear().await {
        Ok(()) => {
            info!("Cache cleared");
            Ok(Json(MessageResponse {
                message: "Cache cleared successfully",
            }))
        }
        Err(e) => {
            error!("Failed to clear cache: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
