use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;

use crate::errors::PipelineError;
use crate::models::{RecipeCandidate, RecipeDetail, RecipeIngredient};

static LIST_ITEM_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("Invalid list item selector"));

static PARAGRAPH_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("Invalid paragraph selector"));

/// Shape a search response into candidates.
///
/// Search is best effort: a failed provider call yields an empty list.
pub fn shape_candidates(result: anyhow::Result<Value>) -> Vec<RecipeCandidate> {
    let payload = match result {
        Ok(payload) => payload,
        Err(e) => {
            log::warn!("⚠️ Recipe search failed, returning no recipes: {:#}", e);
            return Vec::new();
        }
    };

    // complexSearch wraps records in `results`; findByIngredients returns a bare array.
    let records: &[Value] = match &payload {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("results") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => {
                log::warn!("⚠️ Recipe search payload has no `results` array");
                &[]
            }
        },
        _ => {
            log::warn!("⚠️ Unexpected recipe search payload: {}", payload);
            &[]
        }
    };

    records.iter().map(shape_candidate).collect()
}

fn shape_candidate(record: &Value) -> RecipeCandidate {
    RecipeCandidate {
        id: record.get("id").and_then(Value::as_i64),
        title: string_field(record, "title"),
        image: string_field(record, "image"),
    }
}

/// Shape a lookup-by-id response. Provider failures are surfaced.
pub fn shape_detail(result: anyhow::Result<Value>) -> Result<RecipeDetail, PipelineError> {
    let payload = result.map_err(|e| {
        log::error!("❌ Recipe detail lookup failed: {:#}", e);
        PipelineError::UpstreamProvider(format!("{:#}", e))
    })?;

    if !payload.is_object() {
        log::error!("❌ Recipe detail payload is not an object: {}", payload);
        return Err(PipelineError::UpstreamProvider(
            "malformed recipe detail record".to_string(),
        ));
    }

    let title = string_field(&payload, "title");
    if title.is_none() {
        log::warn!("⚠️ Recipe detail has no title, defaulting to null");
    }
    let image = string_field(&payload, "image");
    if image.is_none() {
        log::warn!("⚠️ Recipe detail has no image, defaulting to null");
    }

    Ok(RecipeDetail {
        title,
        image,
        ingredients: shape_ingredients(&payload),
        instructions: shape_instructions(&payload),
    })
}

fn shape_ingredients(payload: &Value) -> Vec<RecipeIngredient> {
    let Some(items) = payload.get("extendedIngredients").and_then(Value::as_array) else {
        log::warn!("⚠️ Recipe detail has no extendedIngredients, defaulting to []");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let name = string_field(item, "name")
                .or_else(|| string_field(item, "originalName"))
                .or_else(|| string_field(item, "original"));
            let Some(name) = name else {
                log::warn!("⚠️ Skipping ingredient without a name: {}", item);
                return None;
            };

            // Amount and unit always come from the same measure
            let metric_amount = item
                .pointer("/measures/metric/amount")
                .and_then(Value::as_f64);
            let (amount, unit) = match metric_amount {
                Some(amount) => (
                    Some(amount),
                    item.pointer("/measures/metric")
                        .and_then(|m| string_field(m, "unitShort")),
                ),
                None => (
                    item.get("amount").and_then(Value::as_f64),
                    string_field(item, "unit"),
                ),
            };

            Some(RecipeIngredient { name, amount, unit })
        })
        .collect()
}

/// Structured steps first, then list items from the HTML blob, else nothing.
fn shape_instructions(payload: &Value) -> Vec<String> {
    let steps = structured_steps(payload);
    if !steps.is_empty() {
        return steps;
    }

    match payload.get("instructions").and_then(Value::as_str) {
        Some(blob) if !blob.trim().is_empty() => instructions_from_html(blob),
        _ => Vec::new(),
    }
}

fn structured_steps(payload: &Value) -> Vec<String> {
    let Some(sections) = payload.get("analyzedInstructions").and_then(Value::as_array) else {
        return Vec::new();
    };

    sections
        .iter()
        .filter_map(|section| section.get("steps").and_then(Value::as_array))
        .flatten()
        .filter_map(|step| string_field(step, "step"))
        .collect()
}

/// Ordered step text from a loosely formatted HTML instructions blob.
pub fn instructions_from_html(blob: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(blob);

    let items = collect_text(&fragment, &LIST_ITEM_SELECTOR);
    if !items.is_empty() {
        return items;
    }

    let paragraphs = collect_text(&fragment, &PARAGRAPH_SELECTOR);
    if !paragraphs.is_empty() {
        return paragraphs;
    }

    // Plain text: one step per non-empty line
    fragment
        .root_element()
        .text()
        .collect::<String>()
        .lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect()
}

fn collect_text(fragment: &Html, selector: &Selector) -> Vec<String> {
    fragment
        .select(selector)
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Non-empty string field, or `None` when missing, null, mistyped or blank.
fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shape_candidates_from_complex_search() {
        let payload = json!({
            "results": [
                {"id": 716429, "title": "Pasta with Garlic", "image": "https://img.example/716429.jpg", "imageType": "jpg"},
                {"id": 715538, "title": "Bruschetta"}
            ],
            "offset": 0,
            "number": 10,
            "totalResults": 2
        });

        let candidates = shape_candidates(Ok(payload));

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, Some(716429));
        assert_eq!(candidates[0].title.as_deref(), Some("Pasta with Garlic"));
        assert_eq!(candidates[1].image, None);
    }

    #[test]
    fn test_shape_candidates_from_bare_array_with_bad_fields() {
        let payload = json!([
            {"id": "not-a-number", "title": 12},
            {"id": 3, "title": "Soup", "image": "https://img.example/3.jpg"}
        ]);

        let candidates = shape_candidates(Ok(payload));

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0], RecipeCandidate { id: None, title: None, image: None });
        assert_eq!(candidates[1].id, Some(3));
    }

    #[test]
    fn test_shape_candidates_on_provider_failure() {
        let candidates = shape_candidates(Err(anyhow::anyhow!("connection refused")));
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_shape_candidates_unexpected_payload() {
        assert!(shape_candidates(Ok(json!("oops"))).is_empty());
        assert!(shape_candidates(Ok(json!({"status": "failure"}))).is_empty());
    }

    #[test]
    fn test_detail_prefers_structured_steps() {
        let payload = json!({
            "title": "Chicken Fried Rice",
            "image": "https://img.example/1.jpg",
            "extendedIngredients": [],
            "instructions": "<ol><li>Ignore me</li></ol>",
            "analyzedInstructions": [
                {"name": "", "steps": [
                    {"number": 1, "step": "Cook the rice."},
                    {"number": 2, "step": "Fry the chicken."}
                ]},
                {"name": "Sauce", "steps": [
                    {"number": 1, "step": "Add soy sauce."}
                ]}
            ]
        });

        let detail = shape_detail(Ok(payload)).unwrap();

        assert_eq!(
            detail.instructions,
            vec!["Cook the rice.", "Fry the chicken.", "Add soy sauce."]
        );
    }

    #[test]
    fn test_detail_falls_back_to_html_list_items() {
        let payload = json!({
            "title": "Pancakes",
            "analyzedInstructions": [],
            "instructions": "<ol><li>Mix flour and eggs.</li><li> Heat the <b>pan</b>. </li><li>Cook until golden.</li></ol>"
        });

        let detail = shape_detail(Ok(payload)).unwrap();

        assert_eq!(
            detail.instructions,
            vec!["Mix flour and eggs.", "Heat the pan.", "Cook until golden."]
        );
    }

    #[test]
    fn test_detail_tolerates_unclosed_list_items() {
        let steps = instructions_from_html("<ol><li>One<li>Two<li>Three</ol>");
        assert_eq!(steps, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn test_detail_plain_text_instructions() {
        let steps = instructions_from_html("Boil water.\nAdd pasta.\n\n");
        assert_eq!(steps, vec!["Boil water.", "Add pasta."]);

        let steps = instructions_from_html("<p>Preheat oven.</p><p>Bake 20 minutes.</p>");
        assert_eq!(steps, vec!["Preheat oven.", "Bake 20 minutes."]);
    }

    #[test]
    fn test_detail_without_instructions() {
        let detail = shape_detail(Ok(json!({"title": "Toast", "instructions": null}))).unwrap();
        assert!(detail.instructions.is_empty());
        assert!(detail.ingredients.is_empty());
        assert_eq!(detail.image, None);
    }

    #[test]
    fn test_detail_flattens_metric_measures() {
        let payload = json!({
            "title": "Rice Bowl",
            "extendedIngredients": [
                {
                    "name": "rice",
                    "amount": 1.0,
                    "unit": "cup",
                    "measures": {
                        "us": {"amount": 1.0, "unitShort": "cup"},
                        "metric": {"amount": 185.0, "unitShort": "g", "unitLong": "grams"}
                    }
                },
                {"name": "salt", "amount": 0.5, "unit": "tsp"},
                {"name": "eggs", "amount": 2, "unit": "", "measures": {"metric": {"amount": 2.0, "unitShort": ""}}},
                {"amount": 3}
            ]
        });

        let detail = shape_detail(Ok(payload)).unwrap();

        assert_eq!(
            detail.ingredients,
            vec![
                RecipeIngredient { name: "rice".into(), amount: Some(185.0), unit: Some("g".into()) },
                RecipeIngredient { name: "salt".into(), amount: Some(0.5), unit: Some("tsp".into()) },
                RecipeIngredient { name: "eggs".into(), amount: Some(2.0), unit: None },
            ]
        );
    }

    #[test]
    fn test_detail_never_mixes_metric_amount_with_us_unit() {
        let payload = json!({
            "title": "Bread",
            "extendedIngredients": [
                {"name": "flour", "amount": 1.0, "unit": "cup",
                 "measures": {"metric": {"amount": 125.0, "unitShort": ""}}},
                {"name": "water", "amount": 0.5, "unit": "cup",
                 "measures": {"metric": {"unitShort": "ml"}}}
            ]
        });

        let detail = shape_detail(Ok(payload)).unwrap();

        assert_eq!(
            detail.ingredients,
            vec![
                RecipeIngredient { name: "flour".into(), amount: Some(125.0), unit: None },
                RecipeIngredient { name: "water".into(), amount: Some(0.5), unit: Some("cup".into()) },
            ]
        );
    }

    #[test]
    fn test_detail_provider_failure_is_surfaced() {
        let err = shape_detail(Err(anyhow::anyhow!("timed out"))).unwrap_err();
        assert!(matches!(err, PipelineError::UpstreamProvider(_)));

        let err = shape_detail(Ok(json!(["not", "an", "object"]))).unwrap_err();
        assert!(matches!(err, PipelineError::UpstreamProvider(_)));
    }
}
