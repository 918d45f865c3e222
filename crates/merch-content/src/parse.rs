//! Turning free-form model output into a [`ProductRecord`].

use merch_core::ProductRecord;

use crate::error::ContentError;

/// Parses model output as a product record.
///
/// Chat models often wrap JSON in a Markdown code fence (```` ```json ````),
/// which is stripped first.
///
/// # Errors
///
/// Returns [`ContentError::MalformedRecord`] if what remains is not a JSON
/// object. Missing copy fields are left empty for the merger to fill.
pub fn parse_product_record(raw: &str) -> Result<ProductRecord, ContentError> {
    serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| ContentError::MalformedRecord { source: e })
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) up to the end of the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json() {
        let record = parse_product_record(
            r#"{"title": "Cosmic Cat Tee", "description": "Cats in space", "tags": ["cats", "space"]}"#,
        )
        .unwrap();
        assert_eq!(record.title, "Cosmic Cat Tee");
        assert_eq!(record.tags, vec!["cats", "space"]);
    }

    #[test]
    fn parses_fenced_json() {
        let raw = "```json\n{\"title\": \"Retro Wave\", \"description\": \"80s vibes\"}\n```";
        let record = parse_product_record(raw).unwrap();
        assert_eq!(record.title, "Retro Wave");
        assert!(record.tags.is_empty());
    }

    #[test]
    fn parses_fence_without_info_string() {
        let raw = "```\n{\"title\": \"A\", \"description\": \"B\"}\n```\n";
        assert_eq!(parse_product_record(raw).unwrap().title, "A");
    }

    #[test]
    fn rejects_prose() {
        let err = parse_product_record("Sure! Here's a fun idea for a shirt.").unwrap_err();
        assert!(matches!(err, ContentError::MalformedRecord { .. }));
    }

    #[test]
    fn accepts_json_without_description() {
        let record = parse_product_record(r#"{"title": "Only a title"}"#).unwrap();
        assert_eq!(record.title, "Only a title");
        assert!(record.description.is_empty());
    }

    #[test]
    fn rejects_json_array() {
        let err = parse_product_record(r#"["title", "description"]"#).unwrap_err();
        assert!(matches!(err, ContentError::MalformedRecord { .. }));
    }
}
