pub mod image;
pub mod normalizer;
pub mod prompt;
pub mod recipe_query;
pub mod recipe_shaper;
pub mod response_parser;

pub use image::decode_image_payload;
pub use normalizer::normalize_ingredients;
pub use prompt::build_ingredient_prompt;
pub use recipe_query::RecipeQuery;
pub use recipe_shaper::{shape_candidates, shape_detail};
pub use response_parser::parse_ingredient_list;
