use std::collections::HashSet;

use crate::models::{Ingredient, UNCERTAINTY_MARKER};

/// Display and search views of the same detected ingredient set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedIngredients {
    /// Trimmed, deduplicated, markers intact. Returned to the caller.
    pub display: Vec<String>,
    /// Markers stripped, deduplicated. Used to build the recipe query.
    pub search: Vec<String>,
}

impl NormalizedIngredients {
    pub fn ingredients(&self) -> Vec<Ingredient> {
        self.display
            .iter()
            .filter_map(|name| Ingredient::from_display(name))
            .collect()
    }
}

pub fn normalize_ingredients<S: AsRef<str>>(raw: &[S]) -> NormalizedIngredients {
    // A bare marker names nothing once stripped
    let display = dedup_preserving_order(
        raw.iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !strip_marker(s).is_empty()),
    );
    let search = dedup_preserving_order(display.iter().map(|s| strip_marker(s)));

    NormalizedIngredients { display, search }
}

/// Remove a single trailing uncertainty marker.
pub fn strip_marker(name: &str) -> &str {
    name.strip_suffix(UNCERTAINTY_MARKER).unwrap_or(name).trim_end()
}

fn dedup_preserving_order<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .filter(|item| !item.is_empty())
        .filter(|item| seen.insert(*item))
        .map(str::to_string)
        .collect()
}
