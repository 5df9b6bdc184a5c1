use serde::Serialize;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TitanRequest<'a> {
    pub(crate) input_text: &'a str,
    pub(crate) text_generation_config: TitanGenerationConfig,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TitanGenerationConfig {
    pub(crate) max_token_count: u32,
    pub(crate) temperature: f64,
}

impl<'a> TitanRequest<'a> {
    pub(crate) fn from_prompt(prompt: &'a str) -> Self {
        Self {
            input_text: prompt,
            text_generation_config: TitanGenerationConfig {
                max_token_count: 512,
                temperature: 0.5,
            },
        }
    }
}
