//! Types describing a single call to the inference endpoint.
//!
//! An [`InferenceRequest`] is turned into a [`ModelRequestDescriptor`] by a request builder, the
//! descriptor is sent with an [`InvokeModel`] client, and the raw answer is wrapped in an
//! [`InferenceResult`]. None of them outlive the invocation.
use std::fmt::Debug;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub const APPLICATION_JSON: &str = "application/json";

/// What kind of output is requested from the model
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskKind {
    Text,
    Image,
}

/// A prompt for a model, constructed per call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceRequest {
    pub task: TaskKind,
    pub model_id: String,
    pub prompt: String,
}

impl InferenceRequest {
    pub fn new(task: TaskKind, model_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            task,
            model_id: model_id.into(),
            prompt: prompt.into(),
        }
    }

    pub fn text(model_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(TaskKind::Text, model_id, prompt)
    }

    pub fn image(model_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(TaskKind::Image, model_id, prompt)
    }
}

/// The vendor specific request for one model invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequestDescriptor {
    /// Model id or arn the request is sent to
    pub endpoint_model_id: String,
    /// Request body in the schema of the model family
    pub body: Value,
    pub content_type: &'static str,
    pub accept: &'static str,
}

impl ModelRequestDescriptor {
    /// A descriptor with a json body that also accepts json
    pub fn json(endpoint_model_id: impl Into<String>, body: Value) -> Self {
        Self {
            endpoint_model_id: endpoint_model_id.into(),
            body,
            content_type: APPLICATION_JSON,
            accept: APPLICATION_JSON,
        }
    }

    /// Serializes the body for the wire
    ///
    /// # Errors
    ///
    /// Errors if the body cannot be serialized
    pub fn body_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.body).context("Failed to serialize request body")
    }
}

/// The parsed response of the inference endpoint
///
/// The shape differs per model family; use the [`crate::normalize`] functions to read from it.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceResult {
    raw: Value,
}

impl InferenceResult {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// Parses a raw response body
    ///
    /// # Errors
    ///
    /// Errors if the body is not valid json
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let raw = serde_json::from_slice(bytes).context("Failed to parse response")?;
        Ok(Self { raw })
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

impl From<Value> for InferenceResult {
    fn from(raw: Value) -> Self {
        Self::new(raw)
    }
}

/// A client that can invoke a model on the inference endpoint.
///
/// Implementations carry no request specific state and are expected to be shared for the
/// lifetime of the process.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait InvokeModel: Debug + Send + Sync {
    /// Sends the request and returns the raw response body
    async fn invoke_model(&self, request: &ModelRequestDescriptor) -> Result<Vec<u8>>;

    fn name(&self) -> &'static str {
        "InvokeModel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_kind_parses_lowercase() {
        assert_eq!("text".parse::<TaskKind>().unwrap(), TaskKind::Text);
        assert_eq!("image".parse::<TaskKind>().unwrap(), TaskKind::Image);
        assert!("video".parse::<TaskKind>().is_err());
        assert_eq!(TaskKind::Image.to_string(), "image");
    }

    #[test]
    fn test_result_from_slice() {
        let result = InferenceResult::from_slice(br#"{"generation": "hi"}"#).unwrap();
        assert_eq!(result.raw(), &json!({"generation": "hi"}));

        assert!(InferenceResult::from_slice(b"not json").is_err());
    }

    #[test]
    fn test_descriptor_body_bytes() {
        let descriptor = ModelRequestDescriptor::json("model", json!({"inputText": "hello"}));
        assert_eq!(descriptor.content_type, "application/json");
        assert_eq!(descriptor.body_bytes().unwrap(), br#"{"inputText":"hello"}"#);
    }
}
