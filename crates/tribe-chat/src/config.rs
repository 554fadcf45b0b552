use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use tribe_api::{ApiConfig, DEFAULT_API_BASE};
use tribe_sync::{DEFAULT_POLL_INTERVAL, MAX_POLL_INTERVAL, SyncConfig};

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub sync: SyncConfig,
    pub db_path: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let base_url = var("TRIBE_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.into());
        let db_path = var("TRIBE_DB_PATH").unwrap_or_else(|| "tribe-chat.db".into());

        let poll_ms: u64 = match var("TRIBE_POLL_INTERVAL_MS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("TRIBE_POLL_INTERVAL_MS is not a number: {raw:?}"))?,
            None => DEFAULT_POLL_INTERVAL.as_millis() as u64,
        };
        anyhow::ensure!(poll_ms > 0, "TRIBE_POLL_INTERVAL_MS must be positive");
        anyhow::ensure!(
            u128::from(poll_ms) <= MAX_POLL_INTERVAL.as_millis(),
            "TRIBE_POLL_INTERVAL_MS must be at most {} ms",
            MAX_POLL_INTERVAL.as_millis()
        );

        let timeout_secs: u64 = var("TRIBE_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".into())
            .parse()
            .context("TRIBE_REQUEST_TIMEOUT_SECS is not a number")?;

        Ok(Self {
            api: ApiConfig {
                base_url,
                request_timeout: Duration::from_secs(timeout_secs),
            },
            sync: SyncConfig {
                poll_interval: Duration::from_millis(poll_ms),
            },
            db_path: PathBuf::from(db_path),
        })
    }
}
