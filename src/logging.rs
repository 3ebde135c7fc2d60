use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing_subscriber::EnvFilter;

/// Installs a JSON-lines subscriber writing to `output_path`. Without a log
/// file nothing is installed, so log events never reach the terminal.
pub fn init_file_logging(output_path: &Path, level: &str) -> Result<()> {
    ensure_parent_dir(output_path)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(output_path)
        .wrap_err_with(|| format!("cannot open log file {}", output_path.display()))?;

    let filter = EnvFilter::try_new(level)
        .map_err(|e| eyre!("invalid log level `{level}`: {e}"))?;

    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .json()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
