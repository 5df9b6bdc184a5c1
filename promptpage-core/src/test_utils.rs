#![allow(clippy::missing_panics_doc)]
//! Mocks and fixtures for testing code that talks to the inference endpoint.
use serde_json::{Value, json};

pub use crate::inference::MockInvokeModel;
pub use crate::telemetry::MockTelemetry;

/// A mock client that answers every invocation with the given json
pub fn mock_client_returning(response: Value) -> MockInvokeModel {
    let body = serde_json::to_vec(&response).expect("json value always serializes");

    let mut client = MockInvokeModel::new();
    client
        .expect_invoke_model()
        .returning(move |_| Ok(body.clone()));
    client
}

/// A mock client that must never be called
pub fn mock_client_unused() -> MockInvokeModel {
    let mut client = MockInvokeModel::new();
    client.expect_invoke_model().never();
    client
}

/// A telemetry mock that accepts any call
pub fn permissive_telemetry() -> MockTelemetry {
    let mut telemetry = MockTelemetry::new();
    telemetry.expect_add_attribute().returning(|_, _| ());
    telemetry.expect_record_generation_time().returning(|_, _| ());
    telemetry.expect_record_token_usage().returning(|_| ());
    telemetry.expect_notice_error().returning(|_| ());
    telemetry
}

/// A titan style response with a single result
pub fn titan_response(text: &str) -> Value {
    json!({
        "inputTextTokenCount": 3,
        "results": [{
            "tokenCount": 5,
            "outputText": text,
            "completionReason": "FINISH"
        }]
    })
}

/// An image generation response with a single base64 image
pub fn image_response(base64_image: &str) -> Value {
    json!({ "images": [base64_image] })
}
