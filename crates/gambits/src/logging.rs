//! File logging. The terminal belongs to the UI, so log lines go to
//! `gambits.log` in the data directory.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use color_eyre::eyre::eyre;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "gambits.log";

/// Environment variable holding the log filter, e.g. `GAMBITS_LOG=debug`.
pub const LOG_ENV: &str = "GAMBITS_LOG";

/// Install the global subscriber writing to `dir`. Returns the log path.
pub fn init(dir: Option<PathBuf>) -> color_eyre::Result<PathBuf> {
    let dir = dir.ok_or_else(|| eyre!("no data directory for log output"))?;
    fs::create_dir_all(&dir)?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| eyre!("failed to install log subscriber: {e}"))?;

    Ok(path)
}
