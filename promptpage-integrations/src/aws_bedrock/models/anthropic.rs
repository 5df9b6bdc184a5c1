use serde::Serialize;

/// Request for the anthropic text completions api
///
/// The prompt must alternate `Human:` and `Assistant:` turns and end on the assistant turn.
#[derive(Serialize, Debug)]
pub(crate) struct AnthropicRequest {
    pub(crate) prompt: String,
    pub(crate) max_tokens_to_sample: u32,
    pub(crate) temperature: f64,
    pub(crate) top_p: f64,
}

impl AnthropicRequest {
    pub(crate) fn from_prompt(prompt: &str) -> Self {
        Self {
            prompt: format!("\n\nHuman:\n{prompt}\n\nAssistant:\n"),
            max_tokens_to_sample: 300,
            temperature: 0.1,
            top_p: 0.9,
        }
    }
}
