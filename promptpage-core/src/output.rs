use serde::{Deserialize, Serialize};

pub const TEXT_HTML: &str = "text/html";

/// A response as handed back to the invocation boundary
///
/// Serializes to the function url response shape:
/// `{"statusCode": 200, "headers": {"Content-Type": "text/html"}, "body": "...", "isBase64Encoded": false}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedOutput {
    pub status_code: u16,
    pub headers: OutputHeaders,
    pub body: String,
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputHeaders {
    #[serde(rename = "Content-Type")]
    pub content_type: String,
}

impl RenderedOutput {
    /// An html response with a plain text body
    pub fn html(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            headers: OutputHeaders {
                content_type: TEXT_HTML.to_string(),
            },
            body: body.into(),
            is_base64_encoded: false,
        }
    }

    pub fn content_type(&self) -> &str {
        &self.headers.content_type
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_serializes_to_function_url_shape() {
        let output = RenderedOutput::html(200, "<p>hi</p>");

        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            json!({
                "statusCode": 200,
                "headers": {"Content-Type": "text/html"},
                "body": "<p>hi</p>",
                "isBase64Encoded": false
            })
        );
    }
}
