use crate::error::GatewayError;
use crate::security::secret_matches;
use crate::server::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use previewgate_upstream::{GraphQLRequest, UpstreamResponse};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, error};

pub const PREVIEW_SECRET_HEADER: &str = "x-preview-secret";

/// `POST /api/preview-proxy`
///
/// Every input check runs before the outbound call.
pub async fn proxy(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, GatewayError> {
    authorize(&state, &headers)?;
    let request = parse_payload(&body)?;

    let Some(endpoint) = state.config.graphql_endpoint.as_ref() else {
        error!("Preview proxy: WORDPRESS_GRAPHQL_ENDPOINT is not configured");
        return Err(GatewayError::EndpointNotConfigured);
    };

    let authorization = state
        .config
        .credentials
        .as_ref()
        .map(|credentials| credentials.authorization_header());

    let response = state
        .upstream
        .execute(
            endpoint,
            &request,
            authorization.as_ref().map(|value| value.expose_secret()),
        )
        .await
        .map_err(|e| {
            error!("Preview proxy: upstream fetch failed: {}", e);
            GatewayError::Upstream(e)
        })?;

    Ok(relay(response))
}

/// Fallback for every method other than POST.
pub async fn method_not_allowed() -> GatewayError {
    GatewayError::MethodNotAllowed
}

/// A present `x-preview-secret` header must match. Without it the request
/// passes unless proxy auth is required, in which case a draft cookie is
/// needed instead.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), GatewayError> {
    if let Some(provided) = headers.get(PREVIEW_SECRET_HEADER) {
        if secret_matches(provided.to_str().ok(), state.config.preview_secret.as_ref()) {
            return Ok(());
        }
        debug!("Preview proxy rejected: {} mismatch", PREVIEW_SECRET_HEADER);
        return Err(GatewayError::Unauthorized);
    }

    if !state.config.require_proxy_auth || state.draft.is_enabled(headers) {
        return Ok(());
    }

    debug!("Preview proxy rejected: no draft cookie or secret header");
    Err(GatewayError::Unauthorized)
}

/// Validate `{ query, variables?, operationName? }`.
pub fn parse_payload(body: &[u8]) -> Result<GraphQLRequest, GatewayError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        debug!("Preview proxy: invalid JSON body: {}", e);
        GatewayError::InvalidJson
    })?;

    let query = value
        .get("query")
        .and_then(Value::as_str)
        .filter(|q| !q.trim().is_empty())
        .ok_or(GatewayError::MissingQuery)?;

    let mut request = GraphQLRequest::new(query);

    match value.get("variables") {
        None | Some(Value::Null) => {}
        Some(vars @ Value::Object(_)) => request = request.with_variables(vars.clone()),
        Some(_) => return Err(GatewayError::InvalidVariables),
    }

    if let Some(name) = value.get("operationName").and_then(Value::as_str) {
        request = request.with_operation_name(name);
    }

    Ok(request)
}

/// JSON bodies go out byte for byte; anything else as `{"raw": ...}`.
fn relay(response: UpstreamResponse) -> Response {
    let status = StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::BAD_GATEWAY);
    if response.wrapped {
        return (status, Json(response.body)).into_response();
    }
    (
        status,
        [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        response.text,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_payload_accepts_query_and_variables() {
        let req = parse_payload(br#"{"query":"{ page { id } }","variables":{"id":1},"operationName":"Page"}"#).unwrap();
        assert_eq!(req.query, "{ page { id } }");
        assert_eq!(req.variables, Some(json!({ "id": 1 })));
        assert_eq!(req.operation_name.as_deref(), Some("Page"));
    }

    #[test]
    fn test_parse_payload_rejections() {
        assert!(matches!(parse_payload(b"}{ not json"), Err(GatewayError::InvalidJson)));
        assert!(matches!(parse_payload(b""), Err(GatewayError::InvalidJson)));
        assert!(matches!(parse_payload(b"{}"), Err(GatewayError::MissingQuery)));
        assert!(matches!(parse_payload(br#"{"query":"  "}"#), Err(GatewayError::MissingQuery)));
        assert!(matches!(parse_payload(br#"{"query":42}"#), Err(GatewayError::MissingQuery)));
        assert!(matches!(parse_payload(b"[]"), Err(GatewayError::MissingQuery)));
        assert!(matches!(
            parse_payload(br#"{"query":"{ a }","variables":[1]}"#),
            Err(GatewayError::InvalidVariables)
        ));
    }

    #[test]
    fn test_null_variables_are_dropped() {
        let req = parse_payload(br#"{"query":"{ a }","variables":null}"#).unwrap();
        assert!(req.variables.is_none());
    }
}
