use crate::models::ImagePayload;

/// Build the instruction sent to the vision model alongside the image.
///
/// The image data itself travels as a separate part of the request; only
/// its MIME type is mentioned here so the prompt stays small and stable.
pub fn build_ingredient_prompt(image: &ImagePayload) -> String {
    format!(
        "Analyze the ingredients present in this image of a pantry ({mime}).\n\
         Detect all the distinct ingredients or food items in the picture.\n\
         When you are unsure or there are multiple possibilities, include those as well, \
         marked with a `?` at the end of the ingredient name.\n\
         Make sure there are no repeated ingredients.\n\
         \n\
         Respond with a JSON array of strings and nothing else. For example:\n\
         [\"ingredient 1\", \"ingredient 2\", \"possible ingredient?\"]\n\
         \n\
         If no ingredients are found or nothing is detectable, return an empty list: []",
        mime = image.mime_type,
    )
}
