//! Handler configuration.
//!
//! Everything has a default, so an empty environment yields a working handler. Values can be
//! overlaid from environment variables with [`HandlerConfig::from_env`].
use std::str::FromStr;
use std::time::Duration;

use derive_builder::{Builder, UninitializedFieldError};
use promptpage_core::TaskKind;
use promptpage_core::render::StreamOptions;
use thiserror::Error;

pub const DEFAULT_MODEL_ID: &str = "amazon.titan-text-express-v1";
pub const DEFAULT_PROMPT: &str =
    "Generate a text about New Relic, Pulumi and Confluent and how AI is bringing it together";
pub const DEFAULT_SERVICE_NAME: &str = "bedrock-ai-service";

pub const ENV_DEFAULT_MODEL_ID: &str = "PROMPTPAGE_DEFAULT_MODEL_ID";
pub const ENV_DEFAULT_PROMPT: &str = "PROMPTPAGE_DEFAULT_PROMPT";
pub const ENV_STREAM_CHUNK_WORDS: &str = "PROMPTPAGE_STREAM_CHUNK_WORDS";
pub const ENV_STREAM_DELAY_MS: &str = "PROMPTPAGE_STREAM_DELAY_MS";
pub const ENV_SERVICE_NAME: &str = "PROMPTPAGE_SERVICE_NAME";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Uninitialized(#[from] UninitializedFieldError),
}

/// Defaults applied to each request, and the pacing of streamed responses
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into), build_fn(error = "ConfigError"))]
pub struct HandlerConfig {
    /// Model used when a request does not name one
    #[builder(default = "DEFAULT_MODEL_ID.to_string()")]
    pub default_model_id: String,

    /// Prompt used when a request does not carry one
    #[builder(default = "DEFAULT_PROMPT.to_string()")]
    pub default_prompt: String,

    #[builder(default = "TaskKind::Text.to_string()")]
    pub default_task: String,

    #[builder(default)]
    pub default_stream: bool,

    /// Reported as the `service_name` attribute
    #[builder(default = "DEFAULT_SERVICE_NAME.to_string()")]
    pub service_name: String,

    #[builder(default)]
    pub stream: StreamOptions,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            default_model_id: DEFAULT_MODEL_ID.to_string(),
            default_prompt: DEFAULT_PROMPT.to_string(),
            default_task: TaskKind::Text.to_string(),
            default_stream: false,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            stream: StreamOptions::default(),
        }
    }
}

impl HandlerConfig {
    pub fn builder() -> HandlerConfigBuilder {
        HandlerConfigBuilder::default()
    }

    /// Reads overrides from the process environment
    ///
    /// # Errors
    ///
    /// Errors if a numeric variable does not parse or the chunk size is zero
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`, empty values are ignored
    ///
    /// # Errors
    ///
    /// Errors if a numeric variable does not parse or the chunk size is zero
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(model_id) = lookup(ENV_DEFAULT_MODEL_ID) {
            config.default_model_id = model_id;
        }
        if let Some(prompt) = lookup(ENV_DEFAULT_PROMPT) {
            config.default_prompt = prompt;
        }
        if let Some(service_name) = lookup(ENV_SERVICE_NAME) {
            config.service_name = service_name;
        }
        if let Some(value) = lookup(ENV_STREAM_CHUNK_WORDS) {
            let chunk_words: usize = parse_var(ENV_STREAM_CHUNK_WORDS, &value)?;
            if chunk_words == 0 {
                return Err(ConfigError::Invalid {
                    key: ENV_STREAM_CHUNK_WORDS,
                    value,
                    reason: "must be at least 1".to_string(),
                });
            }
            config.stream.chunk_words = chunk_words;
        }
        if let Some(value) = lookup(ENV_STREAM_DELAY_MS) {
            config.stream.chunk_delay = Duration::from_millis(parse_var(ENV_STREAM_DELAY_MS, &value)?);
        }

        tracing::debug!(?config, "Loaded handler config");
        Ok(config)
    }
}

fn parse_var<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: err.to_string(),
    })
}
