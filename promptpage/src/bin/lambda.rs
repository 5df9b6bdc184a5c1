//! Runs the handler on the lambda runtime.
//!
//! The Bedrock client and telemetry are created once and shared across invocations. Logs go to
//! stdout, compact by default or as json with `PROMPTPAGE_LOG_FORMAT=json`; filter them with
//! `RUST_LOG`.
use anyhow::Result;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use promptpage::integrations::aws_bedrock::AwsBedrock;
use promptpage::{Handler, HandlerConfig, InvocationEvent};
use serde_json::Value;
use tracing_subscriber::{
    EnvFilter, Layer as _, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

const LOG_FORMAT_VAR: &str = "PROMPTPAGE_LOG_FORMAT";

fn init_tracing() {
    let fmt_layer = if std::env::var(LOG_FORMAT_VAR).is_ok_and(|format| format == "json") {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .without_time()
            .boxed()
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn build_handler(client: AwsBedrock, config: HandlerConfig) -> Result<Handler> {
    let mut builder = Handler::builder();
    builder.client(client);

    #[cfg(feature = "metrics")]
    builder.telemetry(promptpage::integrations::telemetry::MetricsTelemetry::new(
        config.service_name.clone(),
    ));

    builder.config(config).build()
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = HandlerConfig::from_env()?;
    let handler = build_handler(AwsBedrock::from_env().await, config)?;
    tracing::info!(config = ?handler.config(), "Handler ready");

    let handler = &handler;
    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<InvocationEvent>| async move {
            let response = handler.handle(event.payload).await;
            let json: Value = response.into_json().await?;
            Ok::<_, Error>(json)
        },
    ))
    .await
}
