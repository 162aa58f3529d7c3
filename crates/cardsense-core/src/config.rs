//! Service configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 15;

/// Top-level CardSense configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSenseConfig {
    /// HTTP server port.
    pub port: u16,
    /// Root data directory (e.g., `data/`).
    pub data_dir: PathBuf,
    /// Optional backend credentials file (`data/ai-config.json`).
    pub ai_config_file: PathBuf,
    /// Upper bound on a whole classification call, applied by the HTTP layer.
    pub request_timeout: Duration,
    /// Per-call timeout for remote analysis backends.
    pub backend_timeout: Duration,
}

impl CardSenseConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| Error::Config(format!("PORT is not a valid port: {}", p)))?,
            None => DEFAULT_PORT,
        };

        let data_dir = lookup("CARDSENSE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));

        let request_timeout = parse_secs(
            &lookup,
            "CARDSENSE_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        let backend_timeout = parse_secs(
            &lookup,
            "CARDSENSE_BACKEND_TIMEOUT_SECS",
            DEFAULT_BACKEND_TIMEOUT_SECS,
        )?;

        Ok(Self {
            port,
            ai_config_file: data_dir.join("ai-config.json"),
            data_dir,
            request_timeout,
            backend_timeout,
        })
    }
}

impl Default for CardSenseConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from("data");
        Self {
            port: DEFAULT_PORT,
            ai_config_file: data_dir.join("ai-config.json"),
            data_dir,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            backend_timeout: Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS),
        }
    }
}

fn parse_secs<F>(lookup: &F, key: &str, default: u64) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| Error::Config(format!("{} must be whole seconds, got {}", key, raw))),
        None => Ok(Duration::from_secs(default)),
    }
}
