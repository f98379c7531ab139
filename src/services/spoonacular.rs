use anyhow::{Context, Result};
use serde_json::Value;
use std::time::Duration;

use super::RecipeProvider;
use crate::pipeline::RecipeQuery;

const SPOONACULAR_API_BASE: &str = "https://api.spoonacular.com";

/// Spoonacular food API client
pub struct SpoonacularClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl SpoonacularClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Spoonacular HTTP client")?;

        Ok(Self {
            api_key,
            base_url: SPOONACULAR_API_BASE.to_string(),
            client,
        })
    }

    /// Point the client at a different host (staging, local proxy).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .header("x-api-key", self.api_key.as_str())
            .query(params)
            .send()
            .await?;

        let status = response.status();
        log::debug!("📥 Spoonacular response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Spoonacular API error ({}): {}", status, error_text);
        }

        let body = response
            .json::<Value>()
            .await
            .context("Failed to decode Spoonacular response")?;

        Ok(body)
    }
}

#[async_trait::async_trait]
impl RecipeProvider for SpoonacularClient {
    async fn search(&self, query: &RecipeQuery) -> Result<Value> {
        let url = self.api_url("/recipes/complexSearch");
        let params = query.params();

        log::info!("🔍 Searching recipes for: {}", query.ingredients);
        log::debug!("🔍 Search params: {:?}", params);

        self.get_json(&url, &params).await
    }

    async fn lookup(&self, id: i64) -> Result<Value> {
        let url = self.api_url(&format!("/recipes/{}/information", id));
        let params = [("includeNutrition", "false".to_string())];

        log::info!("📖 Fetching recipe details: id={}", id);

        self.get_json(&url, &params).await
    }
}
