use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\b\w+\b").expect("valid word pattern");
}

/// Estimate the number of tokens in a given value.
///
/// # Examples
///
/// ```rust
/// # use promptpage_core::token_estimation::{EstimateTokens, WordEstimator};
/// let tokens = WordEstimator.estimate("Roughly one token per word.");
/// assert_eq!(tokens, 7);
/// ```
pub trait EstimateTokens {
    fn estimate(&self, value: impl Estimatable) -> usize;
}

/// A rough, word based estimator.
///
/// Counts words, scales them by 1.3 and rounds, with a minimum of one token for non-empty
/// text. Text that looks like json or code (contains both `{` and `}`) is scaled by another 1.2.
/// Empty text is zero tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordEstimator;

impl WordEstimator {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn estimate_str(text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }

        let words = WORD.find_iter(text).count();
        let mut tokens = ((words as f64 * 1.3).round() as usize).max(1);

        if text.contains('{') && text.contains('}') {
            tokens = (tokens as f64 * 1.2) as usize;
        }

        tokens
    }
}

impl EstimateTokens for WordEstimator {
    fn estimate(&self, value: impl Estimatable) -> usize {
        let tokens = value
            .for_estimate()
            .iter()
            .map(|s| Self::estimate_str(s))
            .sum::<usize>();

        tracing::debug!(tokens, "Estimated token count");
        tokens
    }
}

/// A value that can be estimated for the number of tokens it contains.
pub trait Estimatable: Send + Sync {
    fn for_estimate(&self) -> Vec<Cow<'_, str>>;
}

impl Estimatable for &str {
    fn for_estimate(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self)]
    }
}

impl Estimatable for String {
    fn for_estimate(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.as_str())]
    }
}

impl Estimatable for &String {
    fn for_estimate(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.as_str())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("", 0; "empty")]
    #[test_case("   ", 1; "whitespace only")]
    #[test_case("hello", 1; "single word")]
    #[test_case("one two three", 4; "three words round up")]
    #[test_case("one two three four five six seven eight nine ten", 13; "ten words")]
    #[test_case("{\"a\": \"b\"}", 3; "json is scaled")]
    #[test_case("{ open only", 3; "single brace is not scaled")]
    fn test_word_estimator(text: &str, expected: usize) {
        assert_eq!(WordEstimator.estimate(text), expected);
    }

    #[test]
    fn test_punctuation_does_not_count_as_words() {
        assert_eq!(
            WordEstimator.estimate("hello, world!"),
            WordEstimator.estimate("hello world")
        );
    }
}
