use crate::config::ConfigError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use previewgate_upstream::UpstreamError;
use serde_json::json;
use thiserror::Error;

/// Per-request failures; each variant maps to one status and body.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Activator secret mismatch; answered in plain text.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid or missing preview secret")]
    Unauthorized,

    #[error("Invalid JSON body")]
    InvalidJson,

    #[error("Missing query")]
    MissingQuery,

    #[error("variables must be an object")]
    InvalidVariables,

    #[error("upstream GraphQL endpoint not configured")]
    EndpointNotConfigured,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::InvalidToken | GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::InvalidJson
            | GatewayError::MissingQuery
            | GatewayError::InvalidVariables => StatusCode::BAD_REQUEST,
            GatewayError::EndpointNotConfigured | GatewayError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            GatewayError::InvalidToken => (status, self.to_string()).into_response(),
            _ => (status, Json(json!({ "error": self.to_string() }))).into_response(),
        }
    }
}

/// Failures that stop the gateway from starting or keep it from serving.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("upstream client error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
