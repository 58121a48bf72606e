// src/main.rs

//! pushpanel
//!
//! Entry point for the pushpanel CLI. Parses arguments, sets up logging,
//! and hands off to the server or the scaffolder.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pushpanel::cli::{Cli, Command};
use pushpanel::config::{Config, Overrides};
use pushpanel::{runtime, scaffold};

/// Program entry point.
///
/// Uses Tokio because each request awaits its script as a child process.
#[tokio::main]
async fn main() -> Result<()> {
    // Only used for RUST_LOG; configuration never comes from the environment.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pushpanel=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            port,
            bind,
            root,
        } => {
            let cfg = Config::resolve(config.as_deref(), Overrides { port, bind, root })?;
            runtime::serve(cfg).await
        }

        Command::Init => scaffold::init_scaffold(Path::new(".")),
    }
}
