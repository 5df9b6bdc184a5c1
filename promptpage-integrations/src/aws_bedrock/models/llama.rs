use serde::Serialize;

#[derive(Serialize, Debug)]
pub(crate) struct LlamaRequest {
    pub(crate) prompt: String,
    pub(crate) max_gen_len: u32,
    pub(crate) temperature: f64,
}

impl LlamaRequest {
    pub(crate) fn from_prompt(prompt: &str) -> Self {
        Self {
            prompt: format!(
                "<|begin_of_text|><|start_header_id|>user<|end_header_id|>\n{prompt}\n<|eot_id|>\n<|start_header_id|>assistant<|end_header_id|>\n"
            ),
            max_gen_len: 512,
            temperature: 0.5,
        }
    }
}
