//! The invocation event and the request it carries.
use std::borrow::Cow;

use anyhow::{Context as _, Result, anyhow};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::HandlerConfig;

const EMPTY_BODY: &str = "{}";

/// A function url style invocation event
///
/// Only the body is used; other fields of the event are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEvent {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl InvocationEvent {
    /// An event with a plain text body
    pub fn from_body(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            is_base64_encoded: false,
        }
    }

    /// The body as text, base64 decoded if flagged; a missing body is an empty json object
    ///
    /// # Errors
    ///
    /// Errors if a base64 flagged body does not decode to utf8 text
    pub fn decoded_body(&self) -> Result<Cow<'_, str>> {
        let Some(body) = self.body.as_deref() else {
            return Ok(Cow::Borrowed(EMPTY_BODY));
        };

        if !self.is_base64_encoded {
            return Ok(Cow::Borrowed(body));
        }

        let bytes = STANDARD
            .decode(body)
            .context("Failed to decode base64 request body")?;
        let text = String::from_utf8(bytes).context("Request body is not valid utf8")?;

        Ok(Cow::Owned(text))
    }
}

/// The json request inside the event body
///
/// Every field is optional; [`RequestBody::resolve`] fills the gaps from the config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    /// Either `text` or `image`; anything else is rejected by the handler
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub stream: Option<bool>,
}

/// A request with all defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    pub model_id: String,
    pub prompt: String,
    pub task: String,
    pub stream: bool,
}

impl RequestBody {
    /// Parses the request from the decoded event body
    ///
    /// # Errors
    ///
    /// Errors if the body is not a json object, or a field has the wrong type
    pub fn parse(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body).context("Failed to parse request body")?;
        if !value.is_object() {
            return Err(anyhow!("Expected a json object, got {}", json_kind(&value))
                .context("Failed to parse request body"));
        }

        serde_json::from_value(value).context("Failed to parse request body")
    }

    pub fn resolve(self, config: &HandlerConfig) -> ResolvedRequest {
        ResolvedRequest {
            model_id: self
                .model_id
                .unwrap_or_else(|| config.default_model_id.clone()),
            prompt: self
                .prompt
                .unwrap_or_else(|| config.default_prompt.clone()),
            task: self.task.unwrap_or_else(|| config.default_task.clone()),
            stream: self.stream.unwrap_or(config.default_stream),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_missing_body_is_empty_object() {
        let event = InvocationEvent::default();
        assert_eq!(event.decoded_body().unwrap(), "{}");

        let request = RequestBody::parse(&event.decoded_body().unwrap())
            .unwrap()
            .resolve(&HandlerConfig::default());

        assert_eq!(
            request,
            ResolvedRequest {
                model_id: "amazon.titan-text-express-v1".into(),
                prompt: crate::config::DEFAULT_PROMPT.into(),
                task: "text".into(),
                stream: false,
            }
        );
    }

    #[test]
    fn test_event_ignores_unknown_fields() {
        let event: InvocationEvent = serde_json::from_str(indoc! {r#"
            {
                "version": "2.0",
                "rawPath": "/",
                "headers": {"content-type": "application/json"},
                "body": "{\"task\": \"image\"}",
                "isBase64Encoded": false
            }
        "#})
        .unwrap();

        let request = RequestBody::parse(&event.decoded_body().unwrap()).unwrap();
        assert_eq!(request.task.as_deref(), Some("image"));
        assert_eq!(request.model_id, None);
    }

    #[test]
    fn test_base64_body_is_decoded() {
        let event = InvocationEvent {
            body: Some(STANDARD.encode(r#"{"prompt": "hello", "stream": true}"#)),
            is_base64_encoded: true,
        };

        let request = RequestBody::parse(&event.decoded_body().unwrap())
            .unwrap()
            .resolve(&HandlerConfig::default());

        assert_eq!(request.prompt, "hello");
        assert!(request.stream);
    }

    #[test_case("[]"; "array")]
    #[test_case("null"; "null")]
    #[test_case("\"text\""; "string")]
    #[test_case("42"; "number")]
    fn test_non_object_bodies_are_rejected(body: &str) {
        let err = RequestBody::parse(body).unwrap_err();

        assert_eq!(err.to_string(), "Failed to parse request body");
        assert!(format!("{err:#}").contains("Expected a json object"));
    }

    #[test]
    fn test_invalid_bodies() {
        assert!(RequestBody::parse("not json").is_err());
        assert!(RequestBody::parse(r#"{"stream": "yes"}"#).is_err());

        let event = InvocationEvent {
            body: Some("%%%".into()),
            is_base64_encoded: true,
        };
        assert!(event.decoded_body().is_err());
    }
}
