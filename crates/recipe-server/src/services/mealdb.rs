//! TheMealDB client

use anyhow::{Context, Result};
use async_trait::async_trait;
use recipe_core::mealdb::{self, SearchResponse};
use recipe_core::ports::RecipeSource;
use recipe_core::{Provenance, Recipe, SourceError};
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

pub struct MealDbClient {
    http: ReqwestClient,
    base_url: String,
}

impl MealDbClient {
    /// Every request is bounded by `timeout`; a timeout counts as a transport failure.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RecipeSource for MealDbClient {
    fn provenance(&self) -> Provenance {
        Provenance::MealDb
    }

    async fn search(&self, query: &str) -> std::result::Result<Vec<Recipe>, SourceError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/search.php", self.base_url);
        debug!("Querying TheMealDB: {}?s={}", url, query);

        let response = self
            .http
            .get(&url)
            .query(&[("s", query)])
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        Ok(body
            .meals
            .unwrap_or_default()
            .iter()
            .map(mealdb::transform)
            .collect())
    }
}
