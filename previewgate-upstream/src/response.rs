use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamResponse {
    pub status_code: u16,
    pub body: Value,
    /// Body exactly as the upstream sent it.
    pub text: String,
    /// True when the upstream body was not JSON and has been wrapped as `{"raw": ...}`.
    pub wrapped: bool,
    pub response_time: Duration,
}

impl UpstreamResponse {
    /// Decode a response body, keeping non-JSON payloads as raw text.
    pub fn from_text(status_code: u16, text: &str, response_time: Duration) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(body) => Self {
                status_code,
                body,
                text: text.to_string(),
                wrapped: false,
                response_time,
            },
            Err(_) => Self {
                status_code,
                body: json!({ "raw": text }),
                text: text.to_string(),
                wrapped: true,
                response_time,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// The upstream body text, byte for byte.
    pub fn body_text(&self) -> &str {
        &self.text
    }
}
