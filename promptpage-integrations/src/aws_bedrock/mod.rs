//! An integration with the AWS Bedrock runtime.
//!
//! Text models are prompted through a request template per model family. Bedrock families share
//! their api, but every model id carries its own fixed generation parameters, so only the model
//! ids listed in [`TEXT_MODELS`] are supported for text.
//!
//! Image requests use a single generic body regardless of the model id.
#[cfg(feature = "aws-bedrock")]
mod client;
mod models;

#[cfg(feature = "aws-bedrock")]
pub use client::AwsBedrock;
pub use models::{ModelFamily, TEXT_MODELS, build_request, cost_family, supported_text_models};
