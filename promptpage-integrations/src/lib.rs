//! Integrations with external services used by promptpage.
//!
//! - [`aws_bedrock`]: request templates per Bedrock model family and, with the `aws-bedrock`
//!   feature, a runtime client implementing [`promptpage_core::InvokeModel`]
//! - `telemetry`: with the `metrics` feature, a [`promptpage_core::Telemetry`] implementation on
//!   top of the `metrics` crate
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod aws_bedrock;

#[cfg(feature = "metrics")]
#[cfg_attr(docsrs, doc(cfg(feature = "metrics")))]
pub mod telemetry;
