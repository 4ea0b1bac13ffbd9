//! Draft-mode session flag.
//!
//! The flag lives in an opaque cookie holding the per-process bypass token.
//! The rendering path checks it with [`DraftMode::is_enabled`].

use crate::config::PreviewConfig;
use crate::security::safe_compare;
use axum::http::header::COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};

pub const DRAFT_COOKIE: &str = "__prerender_bypass";

#[derive(Debug)]
pub struct DraftMode {
    token: SecretString,
    secure: bool,
}

impl DraftMode {
    /// Use the pinned bypass token when configured, otherwise a random one.
    pub fn from_config(config: &PreviewConfig) -> Self {
        let token = match config.bypass_token {
            Some(ref pinned) => pinned.expose_secret().to_string(),
            None => random_token(),
        };
        Self {
            token: SecretString::from(token),
            secure: config.environment.is_production(),
        }
    }

    /// `Set-Cookie` value that turns draft mode on for this browser session.
    pub fn enable_cookie(&self) -> HeaderValue {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            DRAFT_COOKIE,
            self.token.expose_secret()
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        // hex token and fixed attributes are always a valid header value
        let mut value = HeaderValue::from_str(&cookie)
            .unwrap_or_else(|_| HeaderValue::from_static("__prerender_bypass=; Path=/"));
        value.set_sensitive(true);
        value
    }

    /// True when the request carries a draft cookie matching this process' token.
    pub fn is_enabled(&self, headers: &HeaderMap) -> bool {
        let expected = self.token.expose_secret().as_bytes();
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|raw| raw.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .filter(|(name, _)| *name == DRAFT_COOKIE)
            .any(|(_, value)| safe_compare(value.as_bytes(), expected))
    }
}

fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
