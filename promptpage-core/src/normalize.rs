//! Normalizes the heterogeneous response shapes of the model families into one logical output.
//!
//! Text is read from a fixed, ordered list of known fields. The first field that matches
//! wins; if none match, the whole response is serialized as the text.
//!
//! | priority | field | families |
//! |---|---|---|
//! | 1 | `outputText` | Titan (single result) |
//! | 2 | `results[0].outputText` | Titan |
//! | 3 | `generation` | Llama |
//! | 4 | `completion` | Anthropic text completions |
use anyhow::{Context as _, anyhow};
use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde_json::Value;

use crate::errors::InvocationError;

/// Used when `results[0]` exists but has no `outputText`
pub const NO_CONTENT_GENERATED: &str = "No content generated";

/// Standard alphabet, padding optional
const IMAGE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// What a lookup found at its field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMatch {
    Text(String),
    /// The field's container is present but carries no text, i.e. `results[0]` without
    /// `outputText`
    Empty,
}

type FieldLookup = fn(&Value) -> Option<FieldMatch>;

/// Text fields in priority order
pub const TEXT_FIELDS: &[(&str, FieldLookup)] = &[
    ("outputText", lookup_output_text),
    ("results[0].outputText", lookup_first_result),
    ("generation", lookup_generation),
    ("completion", lookup_completion),
];

fn as_text(value: &Value) -> FieldMatch {
    match value {
        Value::String(text) => FieldMatch::Text(text.clone()),
        other => FieldMatch::Text(other.to_string()),
    }
}

fn lookup_output_text(raw: &Value) -> Option<FieldMatch> {
    raw.get("outputText").map(as_text)
}

fn lookup_first_result(raw: &Value) -> Option<FieldMatch> {
    let first = raw.get("results")?.as_array()?.first()?;

    Some(first.get("outputText").map_or(FieldMatch::Empty, as_text))
}

fn lookup_generation(raw: &Value) -> Option<FieldMatch> {
    raw.get("generation").map(as_text)
}

fn lookup_completion(raw: &Value) -> Option<FieldMatch> {
    raw.get("completion").map(as_text)
}

/// Runs the lookups in order and returns the first match, if any
pub fn match_text_field(raw: &Value) -> Option<FieldMatch> {
    TEXT_FIELDS.iter().find_map(|(name, lookup)| {
        let found = lookup(raw)?;
        tracing::trace!(field = *name, "Matched response field");
        Some(found)
    })
}

/// The generated text as counted for token usage
///
/// A matched field without text is empty; `None` if no known field is present.
pub fn extract_output_text(raw: &Value) -> Option<String> {
    match_text_field(raw).map(|found| match found {
        FieldMatch::Text(text) => text,
        FieldMatch::Empty => String::new(),
    })
}

/// Extracts the primary text of a response for display
///
/// A matched field without text shows [`NO_CONTENT_GENERATED`]. Falls back to the json
/// serialization of the whole response if no known field is present.
pub fn extract_primary_text(raw: &Value) -> String {
    match match_text_field(raw) {
        Some(FieldMatch::Text(text)) => text,
        Some(FieldMatch::Empty) => NO_CONTENT_GENERATED.to_string(),
        None => {
            tracing::debug!("No known output field in response, using the full response");
            raw.to_string()
        }
    }
}

/// Extracts and decodes the first generated image
///
/// # Errors
///
/// - [`InvocationError::NoImageGenerated`] if `images` is absent, empty or holds an empty string
/// - [`InvocationError::Internal`] if the image is not a base64 string
pub fn extract_image(raw: &Value) -> Result<Vec<u8>, InvocationError> {
    let image = raw
        .get("images")
        .and_then(Value::as_array)
        .and_then(|images| images.first())
        .ok_or(InvocationError::NoImageGenerated)?;

    let encoded = image
        .as_str()
        .ok_or_else(|| anyhow!("Expected a base64 encoded image, got {image}"))?;

    if encoded.is_empty() {
        return Err(InvocationError::NoImageGenerated);
    }

    IMAGE_ENGINE
        .decode(encoded)
        .context("Failed to decode generated image")
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!({"outputText": "X"}), "X"; "top level output text")]
    #[test_case(json!({"results": [{"outputText": "Y"}]}), "Y"; "titan results")]
    #[test_case(json!({"generation": "Z"}), "Z"; "llama generation")]
    #[test_case(json!({"completion": "C"}), "C"; "anthropic completion")]
    #[test_case(json!({"results": [{"tokenCount": 1}]}), NO_CONTENT_GENERATED; "result without text")]
    #[test_case(json!({"results": [], "generation": "G"}), "G"; "empty results fall through")]
    #[test_case(json!({"outputText": "first", "generation": "second"}), "first"; "priority order")]
    fn test_extract_primary_text(raw: Value, expected: &str) {
        assert_eq!(extract_primary_text(&raw), expected);
    }

    #[test]
    fn test_fallback_serializes_whole_response() {
        let raw = json!({"unknown": "W"});
        let text = extract_primary_text(&raw);

        assert_eq!(text, r#"{"unknown":"W"}"#);
        assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), raw);
        assert_eq!(extract_output_text(&raw), None);
    }

    #[test]
    fn test_result_without_text_is_empty_for_counting() {
        let raw = json!({"results": [{"tokenCount": 1}]});

        assert_eq!(match_text_field(&raw), Some(FieldMatch::Empty));
        assert_eq!(extract_output_text(&raw).as_deref(), Some(""));
        assert_eq!(extract_primary_text(&raw), NO_CONTENT_GENERATED);
    }

    #[test]
    fn test_non_string_fields_are_serialized() {
        assert_eq!(extract_primary_text(&json!({"generation": 42})), "42");
    }

    #[test]
    fn test_extract_image() {
        let bytes = extract_image(&json!({"images": ["abc"]})).unwrap();
        assert_eq!(bytes, IMAGE_ENGINE.decode("abc").unwrap());
        assert_eq!(bytes.len(), 2);

        let bytes = extract_image(&json!({"images": ["aGVsbG8="]})).unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test_case(json!({"images": []}); "empty list")]
    #[test_case(json!({}); "missing field")]
    #[test_case(json!({"images": null}); "null field")]
    #[test_case(json!({"images": [""]}); "empty image")]
    fn test_no_image_generated(raw: Value) {
        assert!(matches!(
            extract_image(&raw),
            Err(InvocationError::NoImageGenerated)
        ));
    }

    #[test]
    fn test_invalid_image_is_internal() {
        assert!(matches!(
            extract_image(&json!({"images": ["%%%"]})),
            Err(InvocationError::Internal(_))
        ));
        assert!(matches!(
            extract_image(&json!({"images": [1]})),
            Err(InvocationError::Internal(_))
        ));
    }
}
