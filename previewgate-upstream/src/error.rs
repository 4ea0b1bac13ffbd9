use std::error::Error as StdError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("upstream request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("{0}")]
    Transport(String),

    #[error("failed to decode upstream response: {0}")]
    Decode(String),

    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("failed to load CA certificate {}: {reason}", path.display())]
    CertificateLoad { path: PathBuf, reason: String },
}

impl UpstreamError {
    /// Classify a reqwest failure. URLs are stripped so a userinfo section
    /// in the endpoint never reaches a caller.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            return UpstreamError::Timeout(timeout);
        }
        if err.is_decode() {
            return UpstreamError::Decode(chain_message(&err.without_url()));
        }
        let msg = chain_message(&err.without_url());
        if is_certificate_failure(&msg) {
            UpstreamError::Transport(format!(
                "{}. Upstream TLS verification failed: trust the issuing CA via PREVIEW_CA_PATH, \
                 or set PREVIEW_ALLOW_INSECURE=true for local development",
                msg
            ))
        } else {
            UpstreamError::Transport(msg)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Timeout(_))
    }
}

/// Render an error and all of its sources as `outer: inner: root`.
pub fn chain_message(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if parts.last() != Some(&text) {
            parts.push(text);
        }
        source = inner.source();
    }
    parts.join(": ")
}

fn is_certificate_failure(msg: &str) -> bool {
    let lower = msg.to_ascii_lowercase();
    lower.contains("certificate") || lower.contains("unable_to_verify_leaf_signature")
}

pub type Result<T> = std::result::Result<T, UpstreamError>;
