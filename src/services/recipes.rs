use anyhow::Result;
use serde_json::Value;

use crate::pipeline::RecipeQuery;

/// Recipe search provider. Payloads are returned raw and shaped by the caller.
#[async_trait::async_trait]
pub trait RecipeProvider: Send + Sync {
    async fn search(&self, query: &RecipeQuery) -> Result<Value>;
    async fn lookup(&self, id: i64) -> Result<Value>;
}
