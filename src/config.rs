use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisionProvider {
    Gemini,
    OpenRouter,
}

impl VisionProvider {
    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Some(VisionProvider::Gemini),
            "openrouter" => Some(VisionProvider::OpenRouter),
            _ => None,
        }
    }

    fn api_key_var(&self) -> &'static str {
        match self {
            VisionProvider::Gemini => "GEMINI_API_KEY",
            VisionProvider::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            VisionProvider::Gemini => "gemini-1.5-flash",
            VisionProvider::OpenRouter => "meta-llama/llama-4-scout:free",
        }
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub vision_provider: VisionProvider,
    pub vision_api_key: String,
    pub vision_model: String,
    pub spoonacular_api_key: String,
    pub spoonacular_base_url: Option<String>,
    pub bind_addr: String,
    pub static_dir: PathBuf,
    pub vision_timeout: Duration,
    pub recipe_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| {
            get(key).with_context(|| format!("{} must be set in the environment or .env file", key))
        };

        let vision_provider = match get("VISION_PROVIDER") {
            Some(name) => VisionProvider::from_string(&name)
                .with_context(|| format!("Unknown VISION_PROVIDER '{}'", name))?,
            None => VisionProvider::Gemini,
        };

        let vision_api_key = require(vision_provider.api_key_var())?;
        let vision_model = get("VISION_MODEL")
            .unwrap_or_else(|| vision_provider.default_model().to_string());
        let spoonacular_api_key = require("SPOONACULAR_API_KEY")?;
        let spoonacular_base_url = get("SPOONACULAR_BASE_URL");

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let static_dir = PathBuf::from(get("STATIC_DIR").unwrap_or_else(|| ".".to_string()));

        let vision_timeout = seconds(get("VISION_TIMEOUT_SECS"), "VISION_TIMEOUT_SECS", 30)?;
        let recipe_timeout = seconds(get("RECIPE_TIMEOUT_SECS"), "RECIPE_TIMEOUT_SECS", 10)?;

        Ok(Self {
            vision_provider,
            vision_api_key,
            vision_model,
            spoonacular_api_key,
            spoonacular_base_url,
            bind_addr,
            static_dir,
            vision_timeout,
            recipe_timeout,
        })
    }
}

fn seconds(value: Option<String>, key: &str, default: u64) -> Result<Duration> {
    let secs = match value {
        Some(v) => v
            .parse::<u64>()
            .with_context(|| format!("{} must be a whole number of seconds, got '{}'", key, v))?,
        None => default,
    };

    if secs == 0 {
        anyhow::bail!("{} must be greater than zero", key);
    }

    Ok(Duration::from_secs(secs))
}
