use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Loaded once at startup and read-only for the process lifetime.
#[derive(Debug, Clone)]
pub struct Config {
    pub ndaq_username: String,
    pub ndaq_password: String,
    pub ndaq_submit_url: String,
    pub ndaq_status_url: String,
    pub ndaq_download_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Maximum status-poll attempts before a generation request times out.
    pub poll_max_attempts: u32,
    /// Fixed delay between status-poll attempts.
    pub poll_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            ndaq_username: require_env("NDAQ_USERNAME")?,
            ndaq_password: require_env("NDAQ_PASSWORD")?,
            ndaq_submit_url: require_env("NDAQ_SUBMIT_URL")?,
            ndaq_status_url: require_env("NDAQ_STATUS_URL")?,
            ndaq_download_url: require_env("NDAQ_DOWNLOAD_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            poll_max_attempts: std::env::var("NDAQ_POLL_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u32>()
                .context("NDAQ_POLL_MAX_ATTEMPTS must be a positive integer")?,
            poll_interval: Duration::from_millis(
                std::env::var("NDAQ_POLL_INTERVAL_MS")
                    .unwrap_or_else(|_| "2000".to_string())
                    .parse::<u64>()
                    .context("NDAQ_POLL_INTERVAL_MS must be a number of milliseconds")?,
            ),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
