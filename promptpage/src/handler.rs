//! The invocation handler.
//!
//! Turns an [`InvocationEvent`] into html. Every failure is caught here and rendered as an error
//! page, so [`Handler::handle`] always produces a response.
use std::sync::Arc;

use anyhow::Result;
use derive_builder::Builder;
use futures_util::StreamExt as _;
use promptpage_core::{
    AttributeValue, ErrorReport, EstimateTokens as _, InferenceRequest, InferenceResult,
    InvocationError, InvokeModel, RenderedOutput, TaskKind, Telemetry, TokenUsage, WordEstimator,
    normalize::{extract_image, extract_output_text, extract_primary_text},
    render::{
        ResponseStream, render_error_html, render_html, render_image_html,
        render_invalid_task_html, render_stream,
    },
    util::{log_excerpt, model_short_name},
};
use promptpage_integrations::aws_bedrock::{build_request, cost_family};
use serde_json::Value;
use tokio::time::Instant;
use uuid::Uuid;

use crate::config::HandlerConfig;
use crate::event::{InvocationEvent, RequestBody};

/// Served when rendering the error page itself fails
const FALLBACK_ERROR_PAGE: &str = "<html><body><h1>Error</h1><p>Internal error</p></body></html>";

/// Handles invocation events against an inference client
///
/// Holds the client and optional telemetry for the lifetime of the process; no state is kept
/// between invocations.
///
/// # Example
///
/// ```no_run
/// # use promptpage::{Handler, InvocationEvent};
/// # use promptpage::integrations::aws_bedrock::AwsBedrock;
/// # async fn run() -> anyhow::Result<()> {
/// let handler = Handler::builder()
///     .client(AwsBedrock::from_env().await)
///     .build()?;
///
/// let response = handler
///     .handle(InvocationEvent::from_body(r#"{"prompt": "Explain tracing"}"#))
///     .await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(error = "anyhow::Error"))]
pub struct Handler {
    #[builder(setter(custom))]
    client: Arc<dyn InvokeModel>,

    #[builder(default, setter(custom))]
    telemetry: Option<Arc<dyn Telemetry>>,

    #[builder(default)]
    config: HandlerConfig,
}

impl HandlerBuilder {
    /// Sets the inference client
    pub fn client(&mut self, client: impl InvokeModel + 'static) -> &mut Self {
        self.client = Some(Arc::new(client));
        self
    }

    /// Sets an already shared inference client
    pub fn shared_client(&mut self, client: Arc<dyn InvokeModel>) -> &mut Self {
        self.client = Some(client);
        self
    }

    /// Reports telemetry to the given backend
    pub fn telemetry(&mut self, telemetry: impl Telemetry + 'static) -> &mut Self {
        self.telemetry = Some(Some(Arc::new(telemetry)));
        self
    }
}

/// The response to a single invocation
pub enum HandlerResponse {
    Single(RenderedOutput),
    /// Fragments of a simulated stream, all with status 200
    Stream(ResponseStream),
}

impl std::fmt::Debug for HandlerResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerResponse::Single(output) => f.debug_tuple("Single").field(output).finish(),
            HandlerResponse::Stream(_) => f.debug_tuple("Stream").finish_non_exhaustive(),
        }
    }
}

impl HandlerResponse {
    /// Collects all outputs, waiting for the stream to finish if needed
    pub async fn into_outputs(self) -> Vec<RenderedOutput> {
        match self {
            HandlerResponse::Single(output) => vec![output],
            HandlerResponse::Stream(stream) => stream.collect().await,
        }
    }

    /// Serializes for the invocation boundary
    ///
    /// A single response is an object, a stream is an array of objects in order.
    ///
    /// # Errors
    ///
    /// Errors if an output fails to serialize
    pub async fn into_json(self) -> Result<Value> {
        let value = match self {
            HandlerResponse::Single(output) => serde_json::to_value(output)?,
            stream @ HandlerResponse::Stream(_) => serde_json::to_value(stream.into_outputs().await)?,
        };

        Ok(value)
    }
}

impl Handler {
    pub fn builder() -> HandlerBuilder {
        HandlerBuilder::default()
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Handles a single invocation
    ///
    /// Never fails: unsupported tasks render a 400 page, every other error a 500 page carrying the
    /// request id.
    #[tracing::instrument(skip_all, fields(request_id))]
    pub async fn handle(&self, event: InvocationEvent) -> HandlerResponse {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());
        let body = event
            .body
            .as_deref()
            .map(|body| log_excerpt(body, 200))
            .unwrap_or_default();
        tracing::info!(%body, is_base64_encoded = event.is_base64_encoded, "Received event");

        self.add_attribute("request_id", request_id.as_str());
        self.add_attribute("service_name", self.config.service_name.as_str());

        match self.dispatch(&event).await {
            Ok(response) => response,
            Err(error) => HandlerResponse::Single(self.error_response(&error, &request_id)),
        }
    }

    async fn dispatch(&self, event: &InvocationEvent) -> Result<HandlerResponse, InvocationError> {
        let body = event.decoded_body()?;
        let request = RequestBody::parse(&body)?.resolve(&self.config);

        self.add_attribute("ai_model", request.model_id.as_str());
        self.add_attribute("ai_task", request.task.as_str());
        self.add_attribute("streaming_enabled", request.stream);
        self.add_attribute("prompt_length", request.prompt.chars().count());
        self.add_attribute("model_family", cost_family(&request.model_id));

        let task = request
            .task
            .parse::<TaskKind>()
            .map_err(|_| InvocationError::UnsupportedTask(request.task.clone()))?;

        let inference = InferenceRequest::new(task, request.model_id, request.prompt);
        let result = self.invoke(&inference).await?;

        let response = match task {
            TaskKind::Text if request.stream => {
                HandlerResponse::Stream(render_stream(&result, self.config.stream)?)
            }
            TaskKind::Text => {
                let text = extract_primary_text(result.raw());
                HandlerResponse::Single(RenderedOutput::html(200, render_html(&text)?))
            }
            TaskKind::Image => {
                let image = extract_image(result.raw())?;
                HandlerResponse::Single(RenderedOutput::html(
                    200,
                    render_image_html(&inference.prompt, &image)?,
                ))
            }
        };

        Ok(response)
    }

    /// Calls the inference endpoint, timing the call and estimating token usage
    ///
    /// # Errors
    ///
    /// Errors if the request cannot be built, the call fails, or the response is empty or not
    /// json. Errors are reported to telemetry before they are returned.
    #[tracing::instrument(skip_all, err, fields(task = %request.task, model_id = %request.model_id))]
    pub async fn invoke(
        &self,
        request: &InferenceRequest,
    ) -> Result<InferenceResult, InvocationError> {
        let start = Instant::now();
        let input_tokens = WordEstimator.estimate(request.prompt.as_str());

        let result = match self.call_model(request).await {
            Ok(result) => result,
            Err(error) => {
                tracing::error!(task = %request.task, %error, "Error calling inference endpoint");
                self.notice_error("invoke", &error, None);
                return Err(error);
            }
        };

        let duration = start.elapsed();
        tracing::info!(
            task = %request.task,
            duration_secs = duration.as_secs_f64(),
            "Generation completed"
        );

        self.with_telemetry(|telemetry| telemetry.record_generation_time(request.task, duration));
        self.add_attribute("input_tokens", input_tokens);

        if request.task == TaskKind::Text {
            let output_text = extract_output_text(result.raw()).unwrap_or_default();
            let output_tokens = WordEstimator.estimate(&output_text);
            tracing::info!(input_tokens, output_tokens, "Estimated text token usage");

            let usage = TokenUsage {
                model: model_short_name(&request.model_id).to_string(),
                input_tokens,
                output_tokens,
            };
            self.add_attribute("output_tokens", output_tokens);
            self.add_attribute("total_tokens", usage.total_tokens());
            self.with_telemetry(|telemetry| telemetry.record_token_usage(&usage));
        }

        Ok(result)
    }

    async fn call_model(&self, request: &InferenceRequest) -> Result<InferenceResult, InvocationError> {
        let descriptor = build_request(request)?;
        let body = self.client.invoke_model(&descriptor).await?;

        if body.is_empty() {
            return Err(InvocationError::NoResponse(request.model_id.clone()));
        }

        let result = InferenceResult::from_slice(&body)?;
        tracing::debug!(
            response = %log_excerpt(&result.raw().to_string(), 500),
            "Received response"
        );

        Ok(result)
    }

    fn error_response(&self, error: &InvocationError, request_id: &str) -> RenderedOutput {
        tracing::error!(kind = error.kind(), %error, "Error processing request");
        self.notice_error("handler", error, Some(request_id));

        let page = match error {
            InvocationError::UnsupportedTask(_) => render_invalid_task_html(),
            _ => render_error_html(&error.to_string(), request_id),
        };

        let body = page.unwrap_or_else(|render_error| {
            tracing::error!(%render_error, "Failed to render error page");
            FALLBACK_ERROR_PAGE.to_string()
        });

        RenderedOutput::html(error.status_code(), body)
    }

    fn with_telemetry(&self, report: impl FnOnce(&dyn Telemetry)) {
        if let Some(telemetry) = &self.telemetry {
            report(telemetry.as_ref());
        }
    }

    fn add_attribute(&self, key: &str, value: impl Into<AttributeValue>) {
        self.with_telemetry(|telemetry| telemetry.add_attribute(key, value.into()));
    }

    fn notice_error(&self, source: &'static str, error: &InvocationError, request_id: Option<&str>) {
        self.with_telemetry(|telemetry| {
            telemetry.notice_error(&ErrorReport {
                source,
                kind: error.kind(),
                message: error.to_string(),
                request_id: request_id.map(str::to_string),
            });
        });
    }
}
