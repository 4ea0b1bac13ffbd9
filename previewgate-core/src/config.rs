//! Process configuration for the gateway.
//!
//! Values are read once at startup (see [`PreviewConfig::from_env`]) and then
//! handed to the router inside an `Arc`; handlers never touch the process
//! environment themselves.

use crate::security::basic_auth_header;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const ENDPOINT_VAR: &str = "WORDPRESS_GRAPHQL_ENDPOINT";
pub const SECRET_VAR: &str = "PREVIEW_SECRET";
pub const USER_VAR: &str = "PREVIEW_USER";
pub const APP_PASSWORD_VAR: &str = "PREVIEW_APP_PASSWORD";
pub const ALLOW_INSECURE_VAR: &str = "PREVIEW_ALLOW_INSECURE";
pub const CA_PATH_VAR: &str = "PREVIEW_CA_PATH";
pub const FETCH_TIMEOUT_VAR: &str = "PREVIEW_FETCH_TIMEOUT_MS";
pub const REQUIRE_AUTH_VAR: &str = "PREVIEW_PROXY_REQUIRE_AUTH";
pub const BYPASS_TOKEN_VAR: &str = "PREVIEW_BYPASS_TOKEN";
pub const ENVIRONMENT_VAR: &str = "APP_ENV";
pub const LISTEN_ADDR_VAR: &str = "PREVIEW_GATE_ADDR";

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("WORDPRESS_GRAPHQL_ENDPOINT is not a valid URL: {0}")]
    InvalidEndpoint(String),

    #[error("WORDPRESS_GRAPHQL_ENDPOINT must use http or https, got '{0}'")]
    UnsupportedScheme(String),

    #[error("PREVIEW_FETCH_TIMEOUT_MS must be a positive number of milliseconds, got '{0}'")]
    InvalidTimeout(String),

    #[error("{var} must be a boolean (true/false), got '{value}'")]
    InvalidBool { var: &'static str, value: String },

    #[error("APP_ENV must be one of production, development, test; got '{0}'")]
    UnknownEnvironment(String),

    #[error("PREVIEW_GATE_ADDR is not a valid socket address: '{0}'")]
    InvalidListenAddr(String),

    #[error("PREVIEW_ALLOW_INSECURE=true is not permitted when APP_ENV=production")]
    InsecureTlsInProduction,

    #[error("PREVIEW_BYPASS_TOKEN may only contain ASCII letters, digits, '-' and '_'")]
    InvalidBypassToken,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Development,
    Test,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Production => "production",
            Environment::Development => "development",
            Environment::Test => "test",
        };
        f.write_str(name)
    }
}

/// Basic-Auth pair for server-to-server calls to the content API.
#[derive(Debug)]
pub struct Credentials {
    pub user: String,
    pub app_password: SecretString,
}

impl Credentials {
    /// Returns `None` unless both halves are non-empty.
    pub fn new(user: Option<String>, app_password: Option<String>) -> Option<Self> {
        match (user, app_password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some(Self {
                user,
                app_password: SecretString::from(pass),
            }),
            _ => None,
        }
    }

    /// `Basic base64(user:password)`
    pub fn authorization_header(&self) -> SecretString {
        SecretString::from(basic_auth_header(
            &self.user,
            self.app_password.expose_secret(),
        ))
    }
}

#[derive(Debug)]
pub struct PreviewConfig {
    pub graphql_endpoint: Option<Url>,
    pub preview_secret: Option<SecretString>,
    pub credentials: Option<Credentials>,
    pub allow_insecure_tls: bool,
    pub ca_path: Option<PathBuf>,
    pub fetch_timeout: Duration,
    pub require_proxy_auth: bool,
    pub bypass_token: Option<SecretString>,
    pub environment: Environment,
    pub listen_addr: SocketAddr,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            graphql_endpoint: None,
            preview_secret: None,
            credentials: None,
            allow_insecure_tls: false,
            ca_path: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            require_proxy_auth: false,
            bypass_token: None,
            environment: Environment::default(),
            listen_addr: DEFAULT_LISTEN_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 3000))),
        }
    }
}

impl PreviewConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let graphql_endpoint = get(ENDPOINT_VAR)
            .map(|raw| parse_endpoint(raw.trim()))
            .transpose()?;

        let fetch_timeout = match get(FETCH_TIMEOUT_VAR) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_FETCH_TIMEOUT,
        };

        let environment = match get(ENVIRONMENT_VAR) {
            Some(raw) => raw.parse()?,
            None => Environment::default(),
        };

        let listen_addr = match get(LISTEN_ADDR_VAR) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidListenAddr(raw.clone()))?,
            None => Self::default().listen_addr,
        };

        Ok(Self {
            graphql_endpoint,
            preview_secret: get(SECRET_VAR).map(SecretString::from),
            credentials: Credentials::new(get(USER_VAR), get(APP_PASSWORD_VAR)),
            allow_insecure_tls: parse_bool(ALLOW_INSECURE_VAR, get(ALLOW_INSECURE_VAR))?,
            ca_path: get(CA_PATH_VAR).map(PathBuf::from),
            fetch_timeout,
            require_proxy_auth: parse_bool(REQUIRE_AUTH_VAR, get(REQUIRE_AUTH_VAR))?,
            bypass_token: get(BYPASS_TOKEN_VAR).map(SecretString::from),
            environment,
            listen_addr,
        })
    }

    /// Startup invariants that span several settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allow_insecure_tls && self.environment.is_production() {
            return Err(ConfigError::InsecureTlsInProduction);
        }
        if let Some(ref token) = self.bypass_token
            && !token
                .expose_secret()
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(ConfigError::InvalidBypassToken);
        }
        Ok(())
    }

    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.graphql_endpoint = Some(endpoint);
        self
    }

    pub fn with_secret(mut self, secret: &str) -> Self {
        self.preview_secret = Some(SecretString::from(secret.to_string()));
        self
    }

    pub fn with_credentials(mut self, user: &str, app_password: &str) -> Self {
        self.credentials = Credentials::new(Some(user.to_string()), Some(app_password.to_string()));
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_insecure_tls(mut self, allow_insecure: bool) -> Self {
        self.allow_insecure_tls = allow_insecure;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_required_proxy_auth(mut self, required: bool) -> Self {
        self.require_proxy_auth = required;
        self
    }

    pub fn with_listen_addr(mut self, addr: SocketAddr) -> Self {
        self.listen_addr = addr;
        self
    }

    /// Human-readable settings with every secret redacted.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let set_or_unset = |present: bool| (if present { "<set>" } else { "<unset>" }).to_string();

        vec![
            ("environment", self.environment.to_string()),
            ("listen_addr", self.listen_addr.to_string()),
            (
                "graphql_endpoint",
                self.graphql_endpoint
                    .as_ref()
                    .map(redacted_endpoint)
                    .unwrap_or_else(|| "<unset>".to_string()),
            ),
            ("preview_secret", set_or_unset(self.preview_secret.is_some())),
            (
                "credentials",
                self.credentials
                    .as_ref()
                    .map(|c| format!("{} / <redacted>", c.user))
                    .unwrap_or_else(|| "<unset>".to_string()),
            ),
            ("allow_insecure_tls", self.allow_insecure_tls.to_string()),
            (
                "ca_path",
                self.ca_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unset>".to_string()),
            ),
            ("fetch_timeout_ms", self.fetch_timeout.as_millis().to_string()),
            ("require_proxy_auth", self.require_proxy_auth.to_string()),
            ("bypass_token", set_or_unset(self.bypass_token.is_some())),
        ]
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidEndpoint(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

fn parse_bool(var: &'static str, raw: Option<String>) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { var, value: raw }),
    }
}

/// Endpoint with any userinfo stripped, for logs.
pub fn redacted_endpoint(url: &Url) -> String {
    let mut shown = url.clone();
    if !shown.username().is_empty() || shown.password().is_some() {
        let _ = shown.set_username("");
        let _ = shown.set_password(None);
    }
    shown.to_string()
}
