use super::types::DebrisCategory;

/// Instruction prompt for the vision model, embedding the user's description.
pub fn build_prompt(description: &str) -> String {
    let categories = DebrisCategory::ALL
        .iter()
        .map(DebrisCategory::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Analyze this image and description: \"{description}\".\n\
         Determine if it contains marine debris per NOAA categories: {categories}.\n\
         Return JSON: {{\"is_debris\": true/false, \"categories\": [list of matching categories]}}.\n\
         If no debris, return empty categories."
    )
}
