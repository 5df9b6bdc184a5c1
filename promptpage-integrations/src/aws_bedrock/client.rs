use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{Client, error::SdkError, primitives::Blob};
use promptpage_core::{InvokeModel, ModelRequestDescriptor};

/// A client for the AWS Bedrock runtime
///
/// Sends a prebuilt [`ModelRequestDescriptor`] with `InvokeModel` and returns the raw body.
/// Construct it once per process and share it across invocations.
///
/// By default, the aws sdk is configured from the environment. If the aws cli is configured with
/// a region, it should work out of the box. Otherwise pass a configured [`Client`] to
/// [`AwsBedrock::new`].
#[derive(Debug, Clone)]
pub struct AwsBedrock {
    client: Arc<Client>,
}

impl AwsBedrock {
    pub fn new(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Configures the runtime client from the environment
    pub async fn from_env() -> Self {
        let config = aws_config::from_env().load().await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl InvokeModel for AwsBedrock {
    #[tracing::instrument(skip_all, err, fields(model_id = %request.endpoint_model_id))]
    async fn invoke_model(&self, request: &ModelRequestDescriptor) -> Result<Vec<u8>> {
        let body = request.body_bytes()?;

        let response = self
            .client
            .invoke_model()
            .model_id(&request.endpoint_model_id)
            .content_type(request.content_type)
            .accept(request.accept)
            .body(Blob::new(body))
            .send()
            .await
            .map_err(SdkError::into_service_error)?;

        Ok(response.body.into_inner())
    }

    fn name(&self) -> &'static str {
        "AwsBedrock"
    }
}
