//! # Promptpage
//!
//! A serverless function that forwards a prompt to AWS Bedrock and answers with an html page.
//!
//! The body of each invocation is a json object, every field optional:
//!
//! ```json
//! {"model_id": "meta.llama3-8b-instruct-v1:0", "prompt": "...", "task": "text", "stream": false}
//! ```
//!
//! Text requests are built from a template per model family and answered with the generated text
//! as html, or as a simulated stream of html fragments when `stream` is set. Image requests use a
//! generic body for any model id and are answered with the image embedded in a page.
//!
//! ## Example
//!
//! ```no_run
//! # use promptpage::{Handler, HandlerConfig, InvocationEvent};
//! # use promptpage::integrations::aws_bedrock::AwsBedrock;
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let handler = Handler::builder()
//!     .client(AwsBedrock::from_env().await)
//!     .config(HandlerConfig::from_env()?)
//!     .build()?;
//!
//! let outputs = handler
//!     .handle(InvocationEvent::from_body(r#"{"prompt": "What is a function url?"}"#))
//!     .await
//!     .into_outputs()
//!     .await;
//!
//! assert_eq!(outputs[0].status_code, 200);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature flags
//!
//! - `aws-bedrock` (default): the Bedrock runtime client
//! - `metrics` (default): telemetry through the `metrics` crate
//! - `lambda` (default): the `promptpage-lambda` binary
//! - `test-utils`: mocks for the inference client and telemetry

pub mod config;
pub mod event;
mod handler;

pub use config::{ConfigError, HandlerConfig, HandlerConfigBuilder};
pub use event::{InvocationEvent, RequestBody, ResolvedRequest};
pub use handler::{Handler, HandlerBuilder, HandlerResponse};

#[doc(inline)]
pub use promptpage_core::{
    AttributeValue, ErrorReport, InferenceRequest, InferenceResult, InvocationError, InvokeModel,
    ModelRequestDescriptor, RenderedOutput, TaskKind, Telemetry, TokenUsage, errors, normalize,
    render, telemetry, token_estimation, util,
};

/// Integrations with external services
pub mod integrations {
    #[doc(inline)]
    pub use promptpage_integrations::*;
}

#[doc(hidden)]
#[cfg(feature = "test-utils")]
pub use promptpage_core::test_utils;
