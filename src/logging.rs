// Tracing setup.
// The terminal belongs to the TUI, so events go to a log file in the data directory.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::error::Result;

/// Install the global subscriber writing to `Config::log_path`.
pub fn init(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.data_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())?;

    let filter = EnvFilter::new(format!(
        "fitlog={}",
        config.log_level.as_str().to_lowercase()
    ));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| crate::error::FitlogError::Other(e.to_string()))?;

    Ok(())
}
