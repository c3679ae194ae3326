//! CLI for the backstop connectivity diagnostics.

mod commands;

use anyhow::Result;
use backstop_core::config;
use backstop_core::connectivity::ConnectivityMonitor;
use backstop_core::retry::Backoff;
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use std::time::Duration;

use commands::{run_check, run_probe, run_watch};

/// Top-level CLI for the backstop diagnostics.
#[derive(Debug, Parser)]
#[command(name = "backstop")]
#[command(about = "backstop: resilient request execution and connectivity diagnostics", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Backoff shape as a CLI argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackoffArg {
    Linear,
    Exponential,
}

impl From<BackoffArg> for Backoff {
    fn from(arg: BackoffArg) -> Self {
        match arg {
            BackoffArg::Linear => Backoff::Linear,
            BackoffArg::Exponential => Backoff::Exponential,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Probe a URL through the retrying executor and report the outcome.
    Probe {
        /// HTTP/HTTPS URL to probe.
        url: String,

        /// Maximum number of attempts (including the first).
        #[arg(long, value_name = "N")]
        attempts: Option<u32>,

        /// Backoff shape between attempts.
        #[arg(long, value_enum)]
        backoff: Option<BackoffArg>,

        /// Per-attempt time budget in seconds.
        #[arg(long, value_name = "S")]
        timeout_secs: Option<u64>,
    },

    /// Run a one-shot connectivity check against the probe endpoint.
    Check {
        /// Override the configured probe endpoint.
        #[arg(long)]
        probe_url: Option<String>,
    },

    /// Poll connectivity on an interval and report transitions.
    Watch {
        /// Seconds between checks.
        #[arg(long, default_value = "30", value_name = "N")]
        interval_secs: u64,

        /// Override the configured probe endpoint.
        #[arg(long)]
        probe_url: Option<String>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let conn = cfg.connectivity_settings();

        match cli.command {
            CliCommand::Probe {
                url,
                attempts,
                backoff,
                timeout_secs,
            } => {
                let mut policy = cfg.retry_policy();
                if let Some(n) = attempts {
                    policy.max_attempts = n.max(1);
                }
                if let Some(shape) = backoff {
                    policy.backoff = shape.into();
                }
                if let Some(secs) = timeout_secs {
                    policy.attempt_timeout = Duration::from_secs(secs);
                }
                let monitor = Arc::new(ConnectivityMonitor::with_probe(
                    conn.probe_url.clone(),
                    conn.probe_timeout(),
                ));
                run_probe(monitor, policy, &url).await?;
            }
            CliCommand::Check { probe_url } => {
                let url = probe_url.unwrap_or(conn.probe_url.clone());
                let monitor = ConnectivityMonitor::with_probe(url, conn.probe_timeout());
                run_check(&monitor).await?;
            }
            CliCommand::Watch {
                interval_secs,
                probe_url,
            } => {
                let url = probe_url.unwrap_or(conn.probe_url.clone());
                let monitor = Arc::new(ConnectivityMonitor::with_probe(url, conn.probe_timeout()));
                run_watch(monitor, Duration::from_secs(interval_secs)).await?;
            }
        }

        Ok(())
    }
}
