use anyhow::Result;

use crate::models::ImagePayload;

/// Vision-capable text generation (Gemini, OpenRouter, ...).
///
/// Implementations return the model's reply verbatim; interpreting it is
/// the caller's job.
#[async_trait::async_trait]
pub trait VisionService: Send + Sync {
    async fn describe_image(&self, prompt: &str, image: &ImagePayload) -> Result<String>;

    /// Model identifier, used in logs.
    fn model_name(&self) -> &str;
}
