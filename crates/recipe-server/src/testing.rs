//! Test helpers: a stand-in TheMealDB server and recipe builders

use crate::services::MealDbClient;
use crate::storage::{MemoryCache, MemoryRecipeStore};
use crate::{build_router, AppState};
use axum::body::Body;
use axum::extract::Query;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use recipe_core::ports::RecipeStore;
use recipe_core::{Difficulty, RecipeDraft, ResultCache};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub fn draft(title: &str) -> RecipeDraft {
    RecipeDraft {
        title: title.to_string(),
        ingredients: vec!["arborio rice".to_string(), "mushrooms".to_string()],
        steps: vec!["Toast the rice".to_string(), "Add stock slowly".to_string()],
        prep_time: "10 minutes".to_string(),
        cook_time: "25 minutes".to_string(),
        difficulty: Difficulty::Easy,
        cuisine: "Italian".to_string(),
    }
}

fn carbonara() -> serde_json::Value {
    json!({
        "idMeal": "52982",
        "strMeal": "Pasta Carbonara",
        "strArea": "Italian",
        "strInstructions": "STEP 1: Boil the spaghetti in salted water.\r\nSTEP 2: Whisk the yolks and toss with the pasta.",
        "strIngredient1": "Spaghetti",
        "strMeasure1": "320g",
        "strIngredient2": "Egg Yolks",
        "strMeasure2": "6",
        "strIngredient3": "Salt",
        "strMeasure3": "1 tsp",
        "strIngredient4": "",
        "strMeasure4": " ",
        "strIngredient5": null,
        "strMeasure5": null
    })
}

async fn search(Query(params): Query<HashMap<String, String>>) -> Response {
    let query = params.get("s").map(|s| s.to_lowercase()).unwrap_or_default();
    match query.as_str() {
        "broken" => "<html>not json</html>".into_response(),
        "error" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "meals": null })).into_response()
        }
        q if "pasta carbonara".contains(q) => Json(json!({ "meals": [carbonara()] })).into_response(),
        _ => Json(json!({ "meals": null })).into_response(),
    }
}

/// Serve a fake TheMealDB on an ephemeral port and return its base URL
pub async fn spawn_mealdb_mock() -> String {
    let app = Router::new().route("/search.php", get(search));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A TCP server that accepts connections and never answers, standing in for
/// a hung Redis. Returns its `redis://` URL.
pub async fn spawn_stalled_redis() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("redis://{}", addr)
}

/// Router over an in-memory store holding `titles` (ids 1..), a fresh memory
/// cache and the fake TheMealDB
pub async fn test_app(titles: &[&str]) -> Router {
    test_app_with_cache(titles, ResultCache::new(Arc::new(MemoryCache::new()))).await
}

pub async fn test_app_with_cache(titles: &[&str], cache: ResultCache) -> Router {
    let store = Arc::new(MemoryRecipeStore::new());
    for title in titles {
        store.create_recipe(draft(title)).await.unwrap();
    }

    let base_url = spawn_mealdb_mock().await;
    let source = Arc::new(MealDbClient::new(&base_url, Duration::from_millis(500)).unwrap());

    build_router(AppState::new(store, source, cache))
}

/// Drive one request through the router; the body is `Null` when empty
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, value)
}
