#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Core types for promptpage.
//!
//! Holds the request and result types that flow through a single invocation, the
//! [`InvokeModel`] seam towards the inference endpoint, the [`Telemetry`] seam, the response
//! normalizer and the HTML renderers.

pub mod errors;
mod inference;
pub mod normalize;
mod output;
pub mod render;
pub mod telemetry;
pub mod token_estimation;

pub use crate::errors::InvocationError;
pub use crate::inference::*;
pub use crate::output::*;
pub use crate::telemetry::{AttributeValue, ErrorReport, Telemetry, TokenUsage};
pub use crate::token_estimation::{Estimatable, EstimateTokens, WordEstimator};

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub mod util;
