//! Telemetry on top of the `metrics` crate.
//!
//! Generation times and token usage are emitted as metrics; attributes and errors as tracing
//! events. Install any `metrics` recorder to collect them.
use std::sync::OnceLock;
use std::time::Duration;

use metrics::{Label, counter, describe_counter, describe_histogram, histogram};
use promptpage_core::{AttributeValue, ErrorReport, TaskKind, Telemetry, TokenUsage};

use crate::aws_bedrock::cost_family;

static METRICS_INIT: OnceLock<bool> = OnceLock::new();

/// Lazily describes all the metrics used in this module once
pub fn lazy_init() {
    METRICS_INIT.get_or_init(|| {
        describe_histogram!(
            "promptpage.generation_time",
            metrics::Unit::Seconds,
            "time spent generating a response"
        );
        describe_counter!("promptpage.usage.input_tokens", "estimated input tokens");
        describe_counter!("promptpage.usage.output_tokens", "estimated output tokens");
        describe_counter!("promptpage.usage.total_tokens", "estimated total tokens");
        describe_counter!("promptpage.errors", "errors noticed while serving");
        true
    });
}

/// Reports telemetry through the `metrics` facade
///
/// Every metric carries the service name as a label.
#[derive(Debug, Clone)]
pub struct MetricsTelemetry {
    service_name: String,
}

impl MetricsTelemetry {
    pub fn new(service_name: impl Into<String>) -> Self {
        lazy_init();
        Self {
            service_name: service_name.into(),
        }
    }

    fn labels(&self) -> Vec<Label> {
        vec![Label::new("service", self.service_name.clone())]
    }
}

impl Default for MetricsTelemetry {
    fn default() -> Self {
        Self::new("promptpage")
    }
}

impl Telemetry for MetricsTelemetry {
    fn add_attribute(&self, key: &str, value: AttributeValue) {
        tracing::info!(service = %self.service_name, key, %value, "Custom attribute");
    }

    fn record_generation_time(&self, task: TaskKind, duration: Duration) {
        let mut labels = self.labels();
        labels.push(Label::new("task", task.to_string()));

        histogram!("promptpage.generation_time", labels.iter()).record(duration.as_secs_f64());
    }

    fn record_token_usage(&self, usage: &TokenUsage) {
        let mut labels = self.labels();
        labels.push(Label::new("model", usage.model.clone()));
        labels.push(Label::new("cost_family", cost_family(&usage.model)));

        counter!("promptpage.usage.input_tokens", labels.iter()).increment(usage.input_tokens as u64);
        counter!("promptpage.usage.output_tokens", labels.iter())
            .increment(usage.output_tokens as u64);
        counter!("promptpage.usage.total_tokens", labels.iter())
            .increment(usage.total_tokens() as u64);
    }

    fn notice_error(&self, report: &ErrorReport) {
        let mut labels = self.labels();
        labels.push(Label::new("source", report.source));
        labels.push(Label::new("kind", report.kind));

        counter!("promptpage.errors", labels.iter()).increment(1);
        tracing::error!(
            service = %self.service_name,
            source = report.source,
            kind = report.kind,
            request_id = report.request_id.as_deref(),
            message = %report.message,
            "Error noticed"
        );
    }

    fn name(&self) -> &'static str {
        "MetricsTelemetry"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_reports_without_a_recorder() {
        let telemetry = MetricsTelemetry::new("test-service");

        telemetry.add_attribute("model_id", "amazon.titan-text-express-v1".into());
        telemetry.record_generation_time(TaskKind::Text, Duration::from_millis(250));
        telemetry.record_token_usage(&TokenUsage {
            model: "titan-text-express-v1".into(),
            input_tokens: 3,
            output_tokens: 12,
        });
        telemetry.notice_error(&ErrorReport {
            source: "handler",
            kind: "internal",
            message: "boom".into(),
            request_id: None,
        });

        assert_eq!(telemetry.name(), "MetricsTelemetry");
        assert!(METRICS_INIT.get().is_some());
    }
}
