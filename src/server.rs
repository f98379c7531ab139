use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::path::Path as FsPath;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::errors::PipelineError;
use crate::handlers::PantryHandler;
use crate::models::AnalyzeRequest;

pub struct AppState {
    pub pantry: Arc<PantryHandler>,
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// JSON API plus the browser UI served from `static_dir`.
pub fn create_router(pantry: Arc<PantryHandler>, static_dir: &FsPath) -> Router {
    create_api_router(pantry)
        .route_service("/recipe/:id", ServeFile::new(static_dir.join("recipe.html")))
        .fallback_service(ServeDir::new(static_dir))
}

pub fn create_api_router(pantry: Arc<PantryHandler>) -> Router {
    let state = Arc::new(AppState { pantry });

    Router::new()
        .route("/analyze-image", post(analyze_image_handler))
        .route("/recipe-details/:id", get(recipe_details_handler))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn analyze_image_handler(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Response, PipelineError> {
    log::info!("🔔 Analyze request received ({} bytes)", body.len());

    let request: AnalyzeRequest = serde_json::from_str(&body).map_err(|e| {
        log::error!("❌ Failed to parse analyze request: {}", e);
        PipelineError::Input(format!("Request body is not valid JSON: {}", e))
    })?;

    let response = state.pantry.analyze_image(request).await?;
    Ok((StatusCode::OK, Json(response)).into_response())
}

async fn recipe_details_handler(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, PipelineError> {
    let id: i64 = id
        .parse()
        .map_err(|_| {
            log::warn!("⚠️ Invalid recipe id '{}'", id);
            PipelineError::Input(format!("Invalid recipe id '{}'", id))
        })?;

    let detail = state.pantry.recipe_details(id).await?;
    Ok((StatusCode::OK, Json(detail)).into_response())
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::pantry::tests::{handler, MockRecipes, MockVision, PNG_BASE64};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn call(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    fn router(vision: MockVision, recipes: MockRecipes) -> Router {
        create_api_router(Arc::new(handler(vision, Arc::new(recipes))))
    }

    #[tokio::test]
    async fn test_analyze_image_route() {
        let recipes = MockRecipes {
            search_result: Some(json!({"results": [{"id": 5, "title": "Omelette", "image": "https://img.example/5.jpg"}]})),
            ..Default::default()
        };
        let app = router(MockVision::replying(r#"["Eggs", "Chives?"]"#), recipes);

        let body = json!({"image": PNG_BASE64, "mealType": "breakfast", "cuisine": ""}).to_string();
        let (status, json) = call(app, post_json("/analyze-image", body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ingredients"], json!(["Eggs", "Chives?"]));
        assert_eq!(json["recipes"][0]["id"], 5);
        assert_eq!(json["recipes"][0]["title"], "Omelette");
    }

    #[tokio::test]
    async fn test_analyze_image_without_image_is_bad_request() {
        let app = router(MockVision::replying("[]"), MockRecipes::default());

        let (status, json) = call(app, post_json("/analyze-image", "{}".to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid request: No image data provided");
    }

    #[tokio::test]
    async fn test_analyze_image_with_garbage_body_is_bad_request() {
        let app = router(MockVision::replying("[]"), MockRecipes::default());

        let (status, json) = call(app, post_json("/analyze-image", "not json".to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_unparseable_model_output_is_server_error() {
        let app = router(MockVision::replying("No food here."), MockRecipes::default());

        let body = json!({"image": PNG_BASE64}).to_string();
        let (status, json) = call(app, post_json("/analyze-image", body)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().contains("Could not parse"));
    }

    #[tokio::test]
    async fn test_recipe_details_route() {
        let recipes = MockRecipes {
            lookup_result: Some(json!({
                "title": "Fried Rice",
                "image": "https://img.example/9.jpg",
                "analyzedInstructions": [{"steps": [{"number": 1, "step": "Fry it."}]}]
            })),
            ..Default::default()
        };
        let app = router(MockVision::replying("[]"), recipes);

        let request = Request::builder().uri("/recipe-details/9").body(Body::empty()).unwrap();
        let (status, json) = call(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["title"], "Fried Rice");
        assert_eq!(json["instructions"], json!(["Fry it."]));
        assert_eq!(json["ingredients"], json!([]));
    }

    #[tokio::test]
    async fn test_recipe_details_provider_failure() {
        let app = router(MockVision::replying("[]"), MockRecipes::default());

        let request = Request::builder().uri("/recipe-details/9").body(Body::empty()).unwrap();
        let (status, json) = call(app, request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json["error"].as_str().unwrap().starts_with("Recipe provider request failed"));
    }

    #[tokio::test]
    async fn test_recipe_details_invalid_id() {
        let app = router(MockVision::replying("[]"), MockRecipes::default());

        let request = Request::builder().uri("/recipe-details/abc").body(Body::empty()).unwrap();
        let (status, _) = call(app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = router(MockVision::replying("[]"), MockRecipes::default());

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
