use serde::Serialize;

/// Generic image request, shared by every image model id
#[derive(Serialize, Debug)]
pub(crate) struct ImageRequest<'a> {
    pub(crate) prompt: &'a str,
    pub(crate) max_tokens: &'static str,
}

impl<'a> ImageRequest<'a> {
    pub(crate) fn from_prompt(prompt: &'a str) -> Self {
        Self {
            prompt,
            max_tokens: "image",
        }
    }
}
