use anyhow::{Context as _, Result};
use promptpage_core::{InferenceRequest, InvocationError, ModelRequestDescriptor, TaskKind};
use serde_json::Value;
use strum_macros::{AsRefStr, Display};

mod anthropic;
mod image;
mod llama;
mod mistral;
mod nova;
mod titan;

use anthropic::AnthropicRequest;
use image::ImageRequest;
use llama::LlamaRequest;
use mistral::MistralRequest;
use nova::NovaRequest;
use titan::TitanRequest;

/// The model family of a text model
///
/// Each family has its own request schema; models within a family share it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ModelFamily {
    /// Amazon Titan text models, `inputText` with a generation config
    Titan,
    /// Amazon Nova, the `messages-v1` schema with a system prompt
    Nova,
    /// Mistral instruct models, prompt wrapped in `[INST]` tokens
    Mistral,
    /// Meta Llama 3 instruct models, prompt wrapped in header tokens
    Llama,
    /// Anthropic text completions, prompt wrapped in `Human:`/`Assistant:` turns
    Anthropic,
}

/// Supported text models by exact model id
///
/// Adding a model with an existing request schema is a single entry here.
pub const TEXT_MODELS: &[(&str, ModelFamily)] = &[
    // Default model when a request names none
    ("amazon.titan-text-express-v1", ModelFamily::Titan),
    ("amazon.titan-text-lite-v1", ModelFamily::Titan),
    ("us.amazon.nova-lite-v1:0", ModelFamily::Nova),
    ("mistral.mistral-7b-instruct-v0:2", ModelFamily::Mistral),
    ("meta.llama3-8b-instruct-v1:0", ModelFamily::Llama),
    (
        "us.anthropic.claude-haiku-4-5-20251001-v1:0",
        ModelFamily::Anthropic,
    ),
];

/// Model ids that can be used for text, in declaration order
pub fn supported_text_models() -> impl Iterator<Item = &'static str> {
    TEXT_MODELS.iter().map(|(model_id, _)| *model_id)
}

impl ModelFamily {
    /// Looks up the family of a text model by its exact id
    pub fn for_model_id(model_id: &str) -> Option<Self> {
        TEXT_MODELS
            .iter()
            .find(|(id, _)| *id == model_id)
            .map(|(_, family)| *family)
    }

    #[tracing::instrument(skip(prompt))]
    pub(crate) fn build_request_body(self, prompt: &str) -> Result<Value> {
        match self {
            ModelFamily::Titan => serde_json::to_value(TitanRequest::from_prompt(prompt)),
            ModelFamily::Nova => serde_json::to_value(NovaRequest::from_prompt(prompt)),
            ModelFamily::Mistral => serde_json::to_value(MistralRequest::from_prompt(prompt)),
            ModelFamily::Llama => serde_json::to_value(LlamaRequest::from_prompt(prompt)),
            ModelFamily::Anthropic => serde_json::to_value(AnthropicRequest::from_prompt(prompt)),
        }
        .context("Failed to serialize request")
    }
}

/// Builds the bedrock request for an inference request
///
/// # Errors
///
/// - [`InvocationError::UnsupportedModel`] if a text request names an unknown model id
/// - [`InvocationError::Internal`] if the body fails to serialize
#[tracing::instrument(skip_all, fields(task = %request.task, model_id = %request.model_id))]
pub fn build_request(request: &InferenceRequest) -> Result<ModelRequestDescriptor, InvocationError> {
    let body = match request.task {
        TaskKind::Text => {
            let family = ModelFamily::for_model_id(&request.model_id)
                .ok_or_else(|| InvocationError::UnsupportedModel(request.model_id.clone()))?;

            family.build_request_body(&request.prompt)?
        }
        TaskKind::Image => serde_json::to_value(ImageRequest::from_prompt(&request.prompt))
            .context("Failed to serialize image request")?,
    };

    Ok(ModelRequestDescriptor::json(&request.model_id, body))
}

/// Classifies a model id for cost tracking
///
/// One of `claude`, `titan`, `llama` or `other`.
pub fn cost_family(model_id: &str) -> &'static str {
    let model_id = model_id.to_lowercase();

    ["claude", "titan", "llama"]
        .into_iter()
        .find(|family| model_id.contains(family))
        .unwrap_or("other")
}
