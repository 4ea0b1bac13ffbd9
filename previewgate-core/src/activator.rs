use crate::error::GatewayError;
use crate::security::{redirect_target, secret_matches};
use crate::server::AppState;
use axum::extract::{RawQuery, State};
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::{debug, info};
use url::form_urlencoded;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ActivateParams {
    pub secret: Option<String>,
    pub slug: Option<String>,
}

impl ActivateParams {
    /// Lenient query parsing that never rejects. A repeated `secret` is
    /// dropped entirely; for `slug` the first value wins.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let mut secret_seen = false;

        for (key, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "secret" if secret_seen => params.secret = None,
                "secret" => {
                    secret_seen = true;
                    params.secret = Some(value.into_owned());
                }
                "slug" if params.slug.is_none() => params.slug = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }
}

/// `GET /api/preview?secret=...&slug=...`
///
/// Fails closed: no configured secret means every request is rejected.
pub async fn activate(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, GatewayError> {
    let params = ActivateParams::from_query(query.as_deref());
    if !secret_matches(params.secret.as_deref(), state.config.preview_secret.as_ref()) {
        debug!("Draft mode activation rejected");
        return Err(GatewayError::InvalidToken);
    }

    let target = redirect_target(params.slug.as_deref());
    info!("Draft mode enabled, redirecting to {}", target);

    Ok((
        [(SET_COOKIE, state.draft.enable_cookie())],
        Redirect::temporary(&target),
    )
        .into_response())
}
