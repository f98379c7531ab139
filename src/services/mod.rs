pub mod gemini; // Google Gemini vision model
pub mod openrouter; // OpenRouter (OpenAI-compatible) vision model
pub mod recipes;
pub mod spoonacular; // Spoonacular recipe API
pub mod vision;

pub use gemini::GeminiService;
pub use openrouter::OpenRouterService;
pub use recipes::RecipeProvider;
pub use spoonacular::SpoonacularClient;
pub use vision::VisionService;
