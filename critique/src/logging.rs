//! File logging.
//!
//! stderr carries the TUI and stdout carries the host protocol, so log lines
//! go to `<dir>/critique.log`. The filter comes from `CRITIQUE_LOG` and
//! defaults to `info`.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "CRITIQUE_LOG";
const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber, appending to `<dir>/critique.log`.
///
/// Returns the log file path.
///
/// # Errors
///
/// Fails if the directory or file cannot be created, or if a global
/// subscriber is already installed.
pub fn init_logging(dir: &Path) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;
    let path = dir.join("critique.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))?;
    Ok(path)
}
