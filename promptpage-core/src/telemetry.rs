//! Optional reporting of per invocation telemetry.
//!
//! The handler holds an `Option<Arc<dyn Telemetry>>` and guards every call, so a missing
//! telemetry backend never changes functional behaviour.
use std::fmt::Debug;
use std::time::Duration;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::TaskKind;

/// Value of a custom attribute on the current transaction
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Str(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<usize> for AttributeValue {
    fn from(value: usize) -> Self {
        AttributeValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Str(value) => write!(f, "{value}"),
            AttributeValue::Int(value) => write!(f, "{value}"),
            AttributeValue::Float(value) => write!(f, "{value}"),
            AttributeValue::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// Estimated token usage of a text generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenUsage {
    /// Short name of the model, see [`crate::util::model_short_name`]
    pub model: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

/// An error as reported to telemetry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Where the error was observed, i.e. `handler` or `invoke`
    pub source: &'static str,
    pub kind: &'static str,
    pub message: String,
    pub request_id: Option<String>,
}

/// A sink for invocation telemetry
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait Telemetry: Debug + Send + Sync {
    /// Adds a custom attribute to the current invocation
    fn add_attribute(&self, key: &str, value: AttributeValue);

    /// Records how long a generation took
    fn record_generation_time(&self, task: TaskKind, duration: Duration);

    /// Records estimated token usage of a text generation
    fn record_token_usage(&self, usage: &TokenUsage);

    fn notice_error(&self, report: &ErrorReport);

    fn name(&self) -> &'static str {
        "Telemetry"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_conversions() {
        assert_eq!(AttributeValue::from("a"), AttributeValue::Str("a".into()));
        assert_eq!(AttributeValue::from(12usize), AttributeValue::Int(12));
        assert_eq!(AttributeValue::from(true).to_string(), "true");
    }

    #[test]
    fn test_total_tokens() {
        let usage = TokenUsage {
            model: "llama3".into(),
            input_tokens: 3,
            output_tokens: 4,
        };
        assert_eq!(usage.total_tokens(), 7);
    }
}
