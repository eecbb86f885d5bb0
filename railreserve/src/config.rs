//! Configuration management for the booking desk.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::assistant::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_STATION};
use crate::desk::{DEFAULT_ASSISTANT_TIMEOUT, DEFAULT_CUSTOMER_NAME};
use std::path::PathBuf;
use std::time::Duration;

/// Seed used for seat maps when none is configured
pub const DEFAULT_CATALOG_SEED: u64 = 2024;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Directory holding the booking list (`RAILRESERVE_DATA_DIR`)
    pub data_dir: PathBuf,
    /// Seed for the generated seat maps (`RAILRESERVE_CATALOG_SEED`)
    pub catalog_seed: u64,
    /// Name written on bookings (`RAILRESERVE_CUSTOMER_NAME`)
    pub customer_name: String,
    /// Assistant configuration
    pub assistant: AssistantConfig,
}

/// Travel assistant configuration
#[derive(Clone)]
pub struct AssistantConfig {
    /// API key (`ANTHROPIC_API_KEY`); the assistant runs offline without one
    pub api_key: Option<String>,
    /// Model name (`RAILRESERVE_ASSISTANT_MODEL`)
    pub model: String,
    /// Reply length cap (`RAILRESERVE_ASSISTANT_MAX_TOKENS`)
    pub max_tokens: u32,
    /// Upper bound on one call (`RAILRESERVE_ASSISTANT_TIMEOUT_SECS`)
    pub timeout: Duration,
    /// Station the assistant speaks for (`RAILRESERVE_STATION_NAME`)
    pub station_name: String,
}

impl Config {
    /// Load configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`.
    ///
    /// Blank values count as unset; values that fail to parse fall back to
    /// the default.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            data_dir: var("RAILRESERVE_DATA_DIR")
                .map_or_else(|| PathBuf::from("data"), PathBuf::from),
            catalog_seed: var("RAILRESERVE_CATALOG_SEED")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_CATALOG_SEED),
            customer_name: var("RAILRESERVE_CUSTOMER_NAME")
                .unwrap_or_else(|| DEFAULT_CUSTOMER_NAME.to_string()),
            assistant: AssistantConfig {
                api_key: var("ANTHROPIC_API_KEY"),
                model: var("RAILRESERVE_ASSISTANT_MODEL")
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                max_tokens: var("RAILRESERVE_ASSISTANT_MAX_TOKENS")
                    .and_then(|s| s.trim().parse().ok())
                    .unwrap_or(DEFAULT_MAX_TOKENS),
                timeout: var("RAILRESERVE_ASSISTANT_TIMEOUT_SECS")
                    .and_then(|s| s.trim().parse().ok())
                    .map_or(DEFAULT_ASSISTANT_TIMEOUT, Duration::from_secs),
                station_name: var("RAILRESERVE_STATION_NAME")
                    .unwrap_or_else(|| DEFAULT_STATION.to_string()),
            },
        }
    }
}

impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .field("station_name", &self.station_name)
            .finish()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &self.data_dir)
            .field("catalog_seed", &self.catalog_seed)
            .field("customer_name", &self.customer_name)
            .field("assistant", &self.assistant)
            .finish()
    }
}
