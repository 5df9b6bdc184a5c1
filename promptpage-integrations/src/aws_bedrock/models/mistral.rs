use serde::Serialize;

#[derive(Serialize, Debug)]
pub(crate) struct MistralRequest {
    pub(crate) prompt: String,
    pub(crate) max_tokens: u32,
    pub(crate) temperature: f64,
    pub(crate) top_p: f64,
    pub(crate) top_k: u32,
}

impl MistralRequest {
    pub(crate) fn from_prompt(prompt: &str) -> Self {
        Self {
            prompt: format!("<s>[INST]\n{prompt}\n[/INST]\n"),
            max_tokens: 400,
            temperature: 0.7,
            top_p: 0.7,
            top_k: 50,
        }
    }
}
