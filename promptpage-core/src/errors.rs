use thiserror::Error;

/// Everything that can go wrong while serving a single invocation.
///
/// All variants end up as an HTML error page at the invocation boundary; see
/// [`InvocationError::status_code`].
#[derive(Error, Debug)]
pub enum InvocationError {
    /// A text request named a model id without a known request template
    #[error("Unsupported text model: {0}")]
    UnsupportedModel(String),

    /// The inference endpoint answered without a usable body
    #[error("No response generated for model: {0}")]
    NoResponse(String),

    #[error("Failed to generate image")]
    NoImageGenerated,

    /// The requested task is neither `text` nor `image`
    #[error("Invalid task type '{0}'. Supported types are 'text' and 'image'.")]
    UnsupportedTask(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl InvocationError {
    /// The http status code the error is reported with
    pub fn status_code(&self) -> u16 {
        match self {
            InvocationError::UnsupportedTask(_) => 400,
            _ => 500,
        }
    }

    /// A stable, short name for the kind of error, used in logs and telemetry
    pub fn kind(&self) -> &'static str {
        match self {
            InvocationError::UnsupportedModel(_) => "unsupported_model",
            InvocationError::NoResponse(_) => "no_response",
            InvocationError::NoImageGenerated => "no_image_generated",
            InvocationError::UnsupportedTask(_) => "unsupported_task",
            InvocationError::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for InvocationError {
    fn from(err: serde_json::Error) -> Self {
        InvocationError::Internal(err.into())
    }
}
