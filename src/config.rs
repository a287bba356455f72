//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every field has a default so the binary runs with no config file at
//! all — the file only exists to override the tax formula, endpoints,
//! or display depth.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::types::TraderError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub tax: TaxConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the real-time price API.
    pub base_url: String,
    /// User agent sent with every request. The wiki asks clients to
    /// identify themselves with a descriptive UA.
    pub user_agent: String,
    /// Per-call timeout in seconds. Expiry is reported as a network error.
    pub timeout_secs: u64,
    /// Retries after the first failed attempt (429/5xx/transport only).
    pub max_retries: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://prices.runescape.wiki/api/v1/osrs".to_string(),
            user_agent: "ge-trader/0.1.0 (flip-finder CLI)".to_string(),
            timeout_secs: 30,
            max_retries: 2,
        }
    }
}

/// GE sale tax parameters. The exact fee formula is deliberately
/// configurable rather than hard-coded.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TaxConfig {
    /// Proportional fee deducted from sale proceeds (0.01 = 1%).
    pub rate: f64,
    /// Per-unit cap on the fee, in gp.
    pub cap: u64,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            rate: 0.01,
            cap: 5_000_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    /// How many ranked items to show.
    pub top_n: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, TraderError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| TraderError::Config(format!("failed to read {path}: {e}")))?;
        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| TraderError::Config(format!("failed to parse {path}: {e}")))?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: &str) -> Result<Self, TraderError> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
