// Runtime configuration.
// Everything is read from the environment; a `.env` file is honoured for local use.

use std::path::PathBuf;
use std::time::Duration;

use tracing::Level;

use crate::session::paths;

const DEFAULT_API_URL: &str = "https://fitnessapp-api-ln8u.onrender.com";
const DEFAULT_SYNC_INTERVAL_MS: u64 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine a data directory; set FITLOG_DATA_DIR")]
    MissingDataDir,
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Settings resolved at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the workout API, without a trailing slash.
    pub api_url: String,
    /// Directory holding the persisted session and the log file.
    pub data_dir: PathBuf,
    pub log_level: Level,
    /// How often the session file is checked for changes made by other processes.
    pub sync_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = parse_api_url(
            &lookup("FITLOG_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;

        let data_dir = match lookup("FITLOG_DATA_DIR") {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => paths::data_dir().ok_or(ConfigError::MissingDataDir)?,
        };

        let level_str = lookup("FITLOG_LOG").unwrap_or_else(|| "info".to_string());
        let log_level = level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "FITLOG_LOG".to_string(),
                format!("'{}' is not a valid log level", level_str),
            )
        })?;

        let sync_interval = match lookup("FITLOG_SYNC_INTERVAL_MS") {
            Some(raw) => {
                let ms = raw.trim().parse::<u64>().map_err(|e| {
                    ConfigError::InvalidValue("FITLOG_SYNC_INTERVAL_MS".to_string(), e.to_string())
                })?;
                Duration::from_millis(ms.max(100))
            }
            None => Duration::from_millis(DEFAULT_SYNC_INTERVAL_MS),
        };

        Ok(Self {
            api_url,
            data_dir,
            log_level,
            sync_interval,
        })
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("fitlog.log")
    }
}

fn parse_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidValue(
            "FITLOG_API_URL".to_string(),
            format!("'{}' is not an http(s) URL", raw),
        ));
    }
    Ok(trimmed.to_string())
}
