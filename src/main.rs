mod config;
mod errors;
mod handlers;
mod models;
mod pipeline;
mod services;
#[cfg(feature = "http-server")]
mod server; // JSON API + static UI

use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::Arc;

use config::{AppConfig, VisionProvider};
use handlers::PantryHandler;
use services::{GeminiService, OpenRouterService, RecipeProvider, SpoonacularClient, VisionService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables before the logger so RUST_LOG from .env applies
    dotenv().ok();
    env_logger::init();

    log::info!("🚀 Starting Pantry Recipes...");

    let config = AppConfig::from_env()?;

    let vision: Arc<dyn VisionService> = match config.vision_provider {
        VisionProvider::Gemini => Arc::new(GeminiService::new(
            config.vision_api_key.clone(),
            config.vision_model.clone(),
            config.vision_timeout,
        )?),
        VisionProvider::OpenRouter => Arc::new(OpenRouterService::new(
            config.vision_api_key.clone(),
            config.vision_model.clone(),
            config.vision_timeout,
        )?),
    };
    log::info!("✅ Vision service initialized ({:?}, model: {})", config.vision_provider, vision.model_name());

    let mut spoonacular =
        SpoonacularClient::new(config.spoonacular_api_key.clone(), config.recipe_timeout)?;
    if let Some(base_url) = &config.spoonacular_base_url {
        log::info!("🔧 Using Spoonacular base URL: {}", base_url);
        spoonacular = spoonacular.with_base_url(base_url.as_str());
    }
    let recipes: Arc<dyn RecipeProvider> = Arc::new(spoonacular);
    log::info!("✅ Spoonacular client initialized");

    let pantry = Arc::new(PantryHandler::new(
        vision,
        recipes,
        config.vision_timeout,
        config.recipe_timeout,
    ));

    #[cfg(feature = "http-server")]
    {
        let app = server::create_router(pantry, &config.static_dir);

        let listener = tokio::net::TcpListener::bind(&config.bind_addr)
            .await
            .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

        log::info!("🌐 Server listening on http://{}", config.bind_addr);
        log::info!("📁 Serving UI from {}", config.static_dir.display());

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;
    }

    #[cfg(not(feature = "http-server"))]
    {
        let _ = pantry;
        log::warn!("⚠️ Built without the http-server feature, nothing to serve");
    }

    log::info!("🛑 Shut down");
    Ok(())
}

#[cfg(feature = "http-server")]
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("❌ Failed to listen for Ctrl+C: {}", e);
    }
    log::info!("🛑 Shutting down...");
}
