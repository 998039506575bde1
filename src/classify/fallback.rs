use super::types::{Classification, DebrisCategory};

/// Description keywords that mark a submission as debris when the model
/// is unavailable.
const FALLBACK_KEYWORDS: &[&str] = &["plastic", "bottle"];

/// Keyword heuristic used whenever the vision model cannot be consulted.
pub fn fallback_classification(description: &str) -> Classification {
    let lowered = description.to_lowercase();
    let is_debris = FALLBACK_KEYWORDS.iter().any(|kw| lowered.contains(kw));

    if is_debris {
        Classification {
            is_debris: true,
            categories: vec![DebrisCategory::Plastic.to_string()],
        }
    } else {
        Classification::not_debris()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plastic_bottle_is_debris() {
        let result = fallback_classification("Found a plastic bottle on the shore");
        assert!(result.is_debris);
        assert_eq!(result.categories, vec!["Plastic"]);
    }

    #[test]
    fn wooden_plank_is_not_debris() {
        assert_eq!(fallback_classification("A wooden plank"), Classification::not_debris());
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        assert!(fallback_classification("BOTTLE cap").is_debris);
        assert!(fallback_classification("Plastic").is_debris);
    }

    #[test]
    fn keyword_inside_word_matches() {
        assert!(fallback_classification("bioplastics everywhere").is_debris);
    }

    #[test]
    fn empty_description_is_not_debris() {
        assert!(!fallback_classification("").is_debris);
    }
}
