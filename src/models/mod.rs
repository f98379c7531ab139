use serde::{Deserialize, Serialize};

/// Trailing marker the vision model appends to low-confidence detections.
pub const UNCERTAINTY_MARKER: char = '?';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub certain: bool,
}

impl Ingredient {
    /// Build an ingredient from a display name. Returns `None` for names
    /// that are blank once the marker is removed.
    pub fn from_display(display: &str) -> Option<Self> {
        let trimmed = display.trim();
        let bare = trimmed
            .strip_suffix(UNCERTAINTY_MARKER)
            .unwrap_or(trimmed)
            .trim_end();
        if bare.is_empty() {
            return None;
        }

        let certain = !trimmed.ends_with(UNCERTAINTY_MARKER);
        Some(Self {
            name: trimmed.to_string(),
            certain,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFilters {
    #[serde(default)]
    pub meal_type: Option<String>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub intolerances: Option<String>,
    #[serde(default)]
    pub diet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeCandidate {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub title: Option<String>,
    pub image: Option<String>,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<String>,
}

/// Image as handed to the vision collaborator: base64 data plus MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String,
}

/// Body of `POST /analyze-image`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(flatten)]
    pub filters: QueryFilters,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub ingredients: Vec<String>,
    pub recipes: Vec<RecipeCandidate>,
}
