use serde::Serialize;

const SCHEMA_VERSION: &str = "messages-v1";
const SYSTEM_PROMPT: &str = "Act as a subject matter expert. When the user provides you with a topic, explain about that topic.";

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NovaRequest<'a> {
    pub(crate) schema_version: &'static str,
    pub(crate) messages: Vec<NovaMessage<'a>>,
    pub(crate) system: Vec<NovaText<'a>>,
    pub(crate) inference_config: NovaInferenceConfig,
}

#[derive(Serialize, Debug)]
pub(crate) struct NovaMessage<'a> {
    pub(crate) role: &'static str, // 'user' or 'assistant'
    pub(crate) content: Vec<NovaText<'a>>,
}

#[derive(Serialize, Debug)]
pub(crate) struct NovaText<'a> {
    pub(crate) text: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NovaInferenceConfig {
    pub(crate) max_tokens: u32,
    pub(crate) top_p: f64,
    pub(crate) top_k: u32,
    pub(crate) temperature: f64,
}

impl<'a> NovaRequest<'a> {
    pub(crate) fn from_prompt(prompt: &'a str) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            messages: vec![NovaMessage {
                role: "user",
                content: vec![NovaText { text: prompt }],
            }],
            system: vec![NovaText {
                text: SYSTEM_PROMPT,
            }],
            inference_config: NovaInferenceConfig {
                max_tokens: 500,
                top_p: 0.9,
                top_k: 20,
                temperature: 0.7,
            },
        }
    }
}
