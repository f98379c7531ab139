use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::PipelineError;
use crate::models::{AnalyzeRequest, AnalyzeResponse, RecipeDetail};
use crate::pipeline::{
    build_ingredient_prompt, decode_image_payload, normalize_ingredients, parse_ingredient_list,
    shape_candidates, shape_detail, RecipeQuery,
};
use crate::services::{RecipeProvider, VisionService};

/// Runs the photo → ingredients → recipes pipeline for one request at a time.
///
/// Holds only immutable service handles, so one instance is shared by all
/// requests.
pub struct PantryHandler {
    vision: Arc<dyn VisionService>,
    recipes: Arc<dyn RecipeProvider>,
    vision_timeout: Duration,
    recipe_timeout: Duration,
}

impl PantryHandler {
    pub fn new(
        vision: Arc<dyn VisionService>,
        recipes: Arc<dyn RecipeProvider>,
        vision_timeout: Duration,
        recipe_timeout: Duration,
    ) -> Self {
        Self {
            vision,
            recipes,
            vision_timeout,
            recipe_timeout,
        }
    }

    pub async fn analyze_image(
        &self,
        request: AnalyzeRequest,
    ) -> Result<AnalyzeResponse, PipelineError> {
        let raw_image = request
            .image
            .as_deref()
            .ok_or_else(|| {
                log::warn!("⚠️ Analyze request has no image");
                PipelineError::Input("No image data provided".to_string())
            })?;
        let image = decode_image_payload(raw_image)?;

        let prompt = build_ingredient_prompt(&image);
        log::debug!("📝 Prompt: {}", prompt);

        log::info!("📸 Analyzing image with {}", self.vision.model_name());
        let reply = with_timeout(
            self.vision_timeout,
            "vision model",
            self.vision.describe_image(&prompt, &image),
        )
        .await
        .map_err(|e| {
            log::error!("❌ Vision model call failed: {:#}", e);
            PipelineError::UpstreamModel(format!("{:#}", e))
        })?;

        let raw_ingredients = parse_ingredient_list(&reply).map_err(|e| {
            log::error!("❌ Could not extract ingredients: {} | response: {}", e, reply);
            PipelineError::from(e)
        })?;

        let normalized = normalize_ingredients(raw_ingredients.as_slice());
        let uncertain = normalized.ingredients().iter().filter(|i| !i.certain).count();
        log::info!("🥕 Ingredients detected: {:?} ({} uncertain)", normalized.display, uncertain);

        let query = RecipeQuery::build(normalized.search.as_slice(), &request.filters).map_err(|e| {
            log::warn!("⚠️ Nothing to search for: {}", e);
            e
        })?;

        let search = with_timeout(self.recipe_timeout, "recipe search", self.recipes.search(&query)).await;
        let recipes = shape_candidates(search);
        log::info!("🍳 Found {} recipe candidates", recipes.len());

        Ok(AnalyzeResponse {
            ingredients: normalized.display,
            recipes,
        })
    }

    pub async fn recipe_details(&self, id: i64) -> Result<RecipeDetail, PipelineError> {
        let lookup = with_timeout(self.recipe_timeout, "recipe lookup", self.recipes.lookup(id)).await;
        shape_detail(lookup)
    }
}

async fn with_timeout<T>(
    limit: Duration,
    what: &str,
    call: impl Future<Output = anyhow::Result<T>>,
) -> anyhow::Result<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => anyhow::bail!("{} timed out after {:?}", what, limit),
    }
}
