use serde::Deserialize;

use super::types::Classification;
use super::ClassifyError;

#[derive(Deserialize)]
struct RawVerdict {
    is_debris: bool,
    categories: Vec<String>,
}

/// Parse the model's reply. Markdown code fences around the JSON are ignored;
/// both fields are required.
pub fn parse_classification(response: &str) -> Result<Classification, ClassifyError> {
    let json = strip_code_fence(response);
    let raw: RawVerdict = serde_json::from_str(json)
        .map_err(|e| ClassifyError::MalformedResponse(format!("{e}: {}", truncate(json, 200))))?;

    Ok(Classification {
        is_debris: raw.is_debris,
        categories: raw.categories,
    })
}

fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let result =
            parse_classification(r#"{"is_debris": true, "categories": ["Plastic", "Metal"]}"#)
                .unwrap();
        assert!(result.is_debris);
        assert_eq!(result.categories, vec!["Plastic", "Metal"]);
    }

    #[test]
    fn parses_fenced_json() {
        let reply = "```json\n{\"is_debris\": false, \"categories\": []}\n```\n";
        assert_eq!(parse_classification(reply).unwrap(), Classification::not_debris());
    }

    #[test]
    fn parses_bare_fence() {
        let reply = "```\n{\"is_debris\": true, \"categories\": [\"Glass\"]}\n```";
        assert_eq!(parse_classification(reply).unwrap().categories, vec!["Glass"]);
    }

    #[test]
    fn keeps_unlisted_category_names() {
        let reply = r#"{"is_debris": true, "categories": ["Fishing Gear"]}"#;
        assert_eq!(parse_classification(reply).unwrap().categories, vec!["Fishing Gear"]);
    }

    #[test]
    fn missing_field_is_malformed() {
        let err = parse_classification(r#"{"is_debris": true}"#).unwrap_err();
        assert!(matches!(err, ClassifyError::MalformedResponse(_)));
    }

    #[test]
    fn prose_reply_is_malformed() {
        let err = parse_classification("I think this is a plastic bottle.").unwrap_err();
        assert!(matches!(err, ClassifyError::MalformedResponse(_)));
    }

    #[test]
    fn wrong_type_is_malformed() {
        let err = parse_classification(r#"{"is_debris": "yes", "categories": []}"#).unwrap_err();
        assert!(matches!(err, ClassifyError::MalformedResponse(_)));
    }
}
