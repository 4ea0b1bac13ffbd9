pub mod activator;
pub mod config;
pub mod draft;
pub mod error;
pub mod health;
pub mod proxy;
pub mod security;
pub mod server;

pub use config::{ConfigError, Credentials, Environment, PreviewConfig};
pub use draft::{DRAFT_COOKIE, DraftMode};
pub use error::{GatewayError, ServerError};
pub use server::{AppState, router, run, serve};

use colored::Colorize;

pub fn print_banner() {
    println!(
        "{} {}",
        "previewgate".bright_cyan().bold(),
        env!("CARGO_PKG_VERSION").bright_white()
    );
    println!(
        "{}",
        "draft-mode activation and credentialed GraphQL preview proxy".bright_blue()
    );
    println!();
}
