//! Utility functions for promptpage
use std::borrow::Cow;

/// Shortens request and response bodies for logging
///
/// Text of at most `max_chars` characters is returned as is. Longer text is cut at a character
/// boundary and followed by a count of the omitted characters.
///
/// # Example
///
/// ```
/// # use promptpage_core::util::log_excerpt;
/// let body = r#"{"prompt": "Grüße aus Köln"}"#;
///
/// assert_eq!(log_excerpt(body, 14), r#"{"prompt": "Gr… (+14 chars)"#);
/// assert_eq!(log_excerpt(body, 100), body);
/// ```
pub fn log_excerpt(text: &str, max_chars: usize) -> Cow<'_, str> {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return Cow::Borrowed(text);
    };

    let omitted = text[cut..].chars().count();
    Cow::Owned(format!("{}… (+{omitted} chars)", &text[..cut]))
}

/// Returns the part of a model id after the last `.`, or the whole id if there is none.
///
/// `meta.llama3-8b-instruct-v1:0` becomes `llama3-8b-instruct-v1:0`.
pub fn model_short_name(model_id: &str) -> &str {
    model_id.rsplit('.').next().unwrap_or(model_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_log_excerpt_keeps_short_bodies() {
        assert!(matches!(log_excerpt("{}", 200), Cow::Borrowed("{}")));
        assert_eq!(log_excerpt("", 0), "");
        assert_eq!(log_excerpt("twelve chars", 12), "twelve chars");
    }

    #[test]
    fn test_log_excerpt_cuts_multibyte_prompts() {
        let prompt = "Wie geht's? ".repeat(3) + &"日本語".repeat(100);

        let excerpt = log_excerpt(&prompt, 40);

        assert!(excerpt.starts_with("Wie geht's? Wie geht's? Wie geht's? 日本語日"));
        assert!(excerpt.ends_with("… (+296 chars)"));
    }

    #[test]
    fn test_model_short_name() {
        assert_eq!(
            model_short_name("us.amazon.nova-lite-v1:0"),
            "nova-lite-v1:0"
        );
        assert_eq!(model_short_name("plain-model"), "plain-model");
    }
}
