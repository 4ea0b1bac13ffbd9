use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use previewgate_core::AppState;
use previewgate_core::config::{PreviewConfig, redacted_endpoint};
use serde_json::{Value, json};
use std::net::SocketAddr;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// fmt subscriber filtered by RUST_LOG, `info` when unset or unparsable
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

// Helper functions for the subcommand handlers

/// Read the process configuration; `--bind` wins over PREVIEW_GATE_ADDR
pub fn load_config(bind: Option<&SocketAddr>) -> Result<PreviewConfig> {
    let config =
        PreviewConfig::from_env().context("failed to read configuration from the environment")?;
    Ok(apply_bind_override(config, bind))
}

pub fn apply_bind_override(config: PreviewConfig, bind: Option<&SocketAddr>) -> PreviewConfig {
    match bind {
        Some(addr) => config.with_listen_addr(*addr),
        None => config,
    }
}

/// Aligned `key  value` lines, secrets already redacted by the config
pub fn render_config_summary(config: &PreviewConfig) -> String {
    let summary = config.summary();
    let width = summary.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

    summary
        .iter()
        .map(|(key, value)| format!("  {:<width$}  {}\n", key, value, width = width))
        .collect()
}

/// Result of a single upstream probe from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    NotConfigured,
    Healthy {
        upstream: String,
        elapsed_ms: u64,
    },
    UpstreamStatus {
        upstream: String,
        status: u16,
        body: String,
    },
    Unreachable {
        upstream: String,
        message: String,
    },
}

impl CheckOutcome {
    pub fn is_healthy(&self) -> bool {
        matches!(self, CheckOutcome::Healthy { .. })
    }

    /// Same shape the health endpoint answers with.
    pub fn to_json(&self) -> Value {
        match self {
            CheckOutcome::NotConfigured => {
                json!({ "ok": false, "error": "upstream GraphQL endpoint not configured" })
            }
            CheckOutcome::Healthy { upstream, elapsed_ms } => {
                json!({ "ok": true, "upstream": upstream, "elapsed_ms": elapsed_ms })
            }
            CheckOutcome::UpstreamStatus {
                upstream,
                status,
                body,
            } => json!({ "ok": false, "upstream": upstream, "status": status, "body": body }),
            CheckOutcome::Unreachable { upstream, message } => json!({
                "ok": false,
                "upstream": upstream,
                "error": "Upstream fetch failed",
                "message": message,
            }),
        }
    }

    pub fn render(&self) -> String {
        match self {
            CheckOutcome::NotConfigured => format!(
                "{} WORDPRESS_GRAPHQL_ENDPOINT is not set",
                "✗".red().bold()
            ),
            CheckOutcome::Healthy {
                upstream,
                elapsed_ms,
            } => format!(
                "{} {} answered in {}ms",
                "✓".green().bold(),
                upstream.bright_white(),
                elapsed_ms
            ),
            CheckOutcome::UpstreamStatus {
                upstream,
                status,
                body,
            } => format!(
                "{} {} answered {}\n  {}",
                "⚠".yellow().bold(),
                upstream.bright_white(),
                status.to_string().yellow(),
                body.bright_black()
            ),
            CheckOutcome::Unreachable { upstream, message } => format!(
                "{} {} could not be reached\n  {}",
                "✗".red().bold(),
                upstream.bright_white(),
                message
            ),
        }
    }
}

/// Validate the configuration, build the same client `serve` would and
/// send one unauthenticated `{ __typename }` probe.
pub async fn run_check(config: PreviewConfig) -> Result<CheckOutcome> {
    let state = AppState::new(config).context("configuration rejected")?;
    let Some(endpoint) = state.config.graphql_endpoint.clone() else {
        return Ok(CheckOutcome::NotConfigured);
    };
    let upstream = redacted_endpoint(&endpoint);
    debug!("Probing {}", upstream);

    let outcome = match state.upstream.probe(&endpoint).await {
        Ok(response) if response.is_success() => CheckOutcome::Healthy {
            upstream,
            elapsed_ms: u64::try_from(response.response_time.as_millis()).unwrap_or(u64::MAX),
        },
        Ok(response) => CheckOutcome::UpstreamStatus {
            upstream,
            status: response.status_code,
            body: response.body_text().to_string(),
        },
        Err(e) => CheckOutcome::Unreachable {
            upstream,
            message: e.to_string(),
        },
    };
    Ok(outcome)
}

// Handler functions

pub async fn handle_serve(args: &ArgMatches) -> Result<()> {
    let bind = args.get_one::<SocketAddr>("bind");
    let config = load_config(bind)?;
    previewgate_core::run(config)
        .await
        .context("gateway stopped with an error")
}

pub async fn handle_check(args: &ArgMatches) -> Result<()> {
    let as_json = args.get_flag("json");
    let outcome = run_check(load_config(None)?).await?;

    if as_json {
        println!("{}", outcome.to_json());
    } else {
        println!("{}", outcome.render());
    }

    if !outcome.is_healthy() {
        std::process::exit(1);
    }
    Ok(())
}

pub fn handle_config() -> Result<()> {
    let config = load_config(None)?;

    println!("{}", "Resolved configuration".bright_cyan().bold());
    print!("{}", render_config_summary(&config));

    if let Err(e) = config.validate() {
        println!();
        println!("{} {}", "✗".red().bold(), e);
        std::process::exit(1);
    }
    Ok(())
}
