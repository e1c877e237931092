//! borgmond — the borgmon daemon.
//!
//! Polls the `transactions` log of each configured BorgBackup repository
//! and exposes the last transaction number and time as Prometheus gauges.
//!
//! # Usage
//!
//! ```text
//! borgmond serve --config /etc/borgmon/config.json
//! borgmond check --config /etc/borgmon/config.json
//! ```

mod check;
mod serve;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use borgmon_core::ExporterConfig;

#[derive(Parser)]
#[command(
    name = "borgmond",
    about = "BorgBackup transaction exporter for Prometheus",
    version
)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Poll repositories and serve metrics until interrupted.
    Serve {
        /// Path to the configuration file (JSON, or TOML with a .toml extension).
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,
    },
    /// Run a single sweep and print the exposition to stdout.
    ///
    /// Exits non-zero if any repository could not be read or parsed.
    Check {
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match cli.command {
        Command::Serve { config } => serve::run_serve(load_config(&config)?).await,
        Command::Check { config } => check::run_check(load_config(&config)?).await,
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,borgmond=debug,borgmon_metrics=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: &Path) -> anyhow::Result<ExporterConfig> {
    let config = ExporterConfig::from_file(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    if config.repos.is_empty() {
        tracing::warn!(path = %path.display(), "no repositories configured");
    }
    Ok(config)
}
