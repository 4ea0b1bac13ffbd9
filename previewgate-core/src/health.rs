use crate::config::redacted_endpoint;
use crate::server::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::warn;

/// `GET /api/preview-proxy/health`: one `{ __typename }` round trip, no credentials.
pub async fn health(State(state): State<AppState>) -> Response {
    let Some(endpoint) = state.config.graphql_endpoint.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "ok": false, "error": "upstream GraphQL endpoint not configured" })),
        )
            .into_response();
    };
    let upstream = redacted_endpoint(endpoint);

    match state.upstream.probe(endpoint).await {
        Ok(response) if response.is_success() => (
            StatusCode::OK,
            Json(json!({ "ok": true, "upstream": upstream })),
        )
            .into_response(),
        Ok(response) => {
            warn!("Health probe: upstream answered {}", response.status_code);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "ok": false,
                    "upstream": upstream,
                    "status": response.status_code,
                    "body": response.body_text(),
                })),
            )
                .into_response()
        }
        Err(e) => {
            warn!("Health probe failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "ok": false,
                    "error": "Upstream fetch failed",
                    "message": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
