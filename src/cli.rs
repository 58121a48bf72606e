// src/cli.rs

use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

/// Local web control panel that runs an allow-listed script on demand.
///
/// `pushpanel.yaml` is optional. CLI flags only override config values.
#[derive(Parser, Debug)]
#[command(name = "pushpanel", version, disable_help_subcommand = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// All supported CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the control panel server.
    ///
    /// Without a config file this serves the current directory on
    /// 0.0.0.0:5000 and allows only ./github_push.sh.
    Serve {
        /// Path to config file
        ///
        /// Defaults to ./pushpanel.yaml when it exists.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override listening port
        #[arg(long)]
        port: Option<u16>,

        /// Override bind address
        ///
        /// Example:
        /// --bind 127.0.0.1
        #[arg(long)]
        bind: Option<IpAddr>,

        /// Override working root (static files + script resolution)
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Initialise a panel scaffold in the current directory.
    ///
    /// Creates, skipping files that already exist:
    /// - pushpanel.yaml
    /// - github_push.sh
    /// - github-push-ui.html
    Init,
}
