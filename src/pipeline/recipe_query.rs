use crate::errors::PipelineError;
use crate::models::QueryFilters;

/// Maximum number of recipe candidates requested per search.
pub const RESULT_CAP: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    FewestMissingIngredients,
}

impl SortOrder {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::FewestMissingIngredients => "min-missing-ingredients",
        }
    }
}

/// Provider-agnostic description of one ingredient search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeQuery {
    pub ingredients: String,
    pub number: u32,
    pub sort: SortOrder,
    pub meal_type: Option<String>,
    pub cuisine: Option<String>,
    pub intolerances: Option<String>,
    pub diet: Option<String>,
}

impl RecipeQuery {
    pub fn build<S: AsRef<str>>(
        search_terms: &[S],
        filters: &QueryFilters,
    ) -> Result<Self, PipelineError> {
        let terms: Vec<&str> = search_terms
            .iter()
            .map(|t| t.as_ref().trim())
            .filter(|t| !t.is_empty())
            .collect();

        if terms.is_empty() {
            return Err(PipelineError::InvalidQuery);
        }

        Ok(Self {
            ingredients: terms.join(","),
            number: RESULT_CAP,
            sort: SortOrder::FewestMissingIngredients,
            meal_type: non_empty(&filters.meal_type),
            cuisine: non_empty(&filters.cuisine),
            intolerances: non_empty(&filters.intolerances),
            diet: non_empty(&filters.diet),
        })
    }

    /// Query-string parameters for the search endpoint, filters only when set.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("includeIngredients", self.ingredients.clone()),
            ("number", self.number.to_string()),
            ("sort", self.sort.as_param().to_string()),
        ];

        let filters = [
            ("type", &self.meal_type),
            ("cuisine", &self.cuisine),
            ("intolerances", &self.intolerances),
            ("diet", &self.diet),
        ];
        for (key, value) in filters {
            if let Some(value) = value {
                params.push((key, value.clone()));
            }
        }

        params
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
