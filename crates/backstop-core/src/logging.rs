//! Logging init: file under the XDG state dir, stderr when that fails.

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,backstop=debug"))
}

fn open_log_file() -> Result<(fs::File, PathBuf)> {
    let state_dir = xdg::BaseDirectories::with_prefix("backstop")?.get_state_home();
    fs::create_dir_all(&state_dir)?;
    let path = state_dir.join("backstop.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    Ok((file, path))
}

/// Initialize structured logging.
///
/// Events go to `~/.local/state/backstop/backstop.log`. If the state dir is
/// unusable, or cloning the log handle fails mid-run, events land on stderr
/// instead, so a broken home directory never takes the tool down. Safe to
/// call more than once; only the first call installs a subscriber.
pub fn init() {
    match open_log_file() {
        Ok((file, path)) => {
            let writer = BoxMakeWriter::new(move || -> Box<dyn io::Write> {
                match file.try_clone() {
                    Ok(clone) => Box::new(clone),
                    Err(_) => Box::new(io::stderr()),
                }
            });
            let installed = tracing_subscriber::fmt()
                .with_env_filter(default_filter())
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .is_ok();
            if installed {
                tracing::info!("backstop logging initialized at {}", path.display());
            }
        }
        Err(err) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(default_filter())
                .with_writer(io::stderr)
                .with_ansi(false)
                .try_init();
            tracing::warn!("log file unavailable ({:#}); logging to stderr", err);
        }
    }
}
