//! Store configuration.
//!
//! Every field has a default, so an empty TOML file (or none at all) gives a
//! working store:
//!
//! ```toml
//! data_dir = "./data"
//! api_delay_ms = 0
//!
//! [pricing]
//! free_shipping_threshold = 5000.0
//! shipping_fee = 300.0
//! tax_rate = 0.2
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory of the file-backed key-value store.
    pub data_dir: PathBuf,
    /// Request channel capacity of each collection actor.
    pub actor_buffer: usize,
    /// Artificial latency of the mock API.
    pub api_delay_ms: u64,
    /// How long a toast stays visible.
    pub toast_duration_ms: u64,
    /// Products at or below this stock level show up as low stock.
    pub low_stock_threshold: u32,
    /// Registrations whose email contains this marker become admins.
    /// `None` or an empty string disables the rule.
    pub admin_email_marker: Option<String>,
    pub pricing: PricingRules,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            actor_buffer: 32,
            api_delay_ms: 300,
            toast_duration_ms: 3000,
            low_stock_threshold: 5,
            admin_email_marker: Some("admin".to_string()),
            pricing: PricingRules::default(),
        }
    }
}

/// Order summary rules: flat shipping below a threshold, fixed tax rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingRules {
    pub free_shipping_threshold: f64,
    pub shipping_fee: f64,
    pub tax_rate: f64,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            free_shipping_threshold: 5000.0,
            shipping_fee: 300.0,
            tax_rate: 0.2,
        }
    }
}

impl StoreConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.actor_buffer == 0 {
            return Err(ConfigError::Invalid("actor_buffer must be greater than 0".into()));
        }
        let pricing = &self.pricing;
        if !(pricing.shipping_fee >= 0.0 && pricing.free_shipping_threshold >= 0.0) {
            return Err(ConfigError::Invalid("shipping amounts must not be negative".into()));
        }
        if !(0.0..=1.0).contains(&pricing.tax_rate) {
            return Err(ConfigError::Invalid("tax_rate must be within 0..=1".into()));
        }
        Ok(())
    }

    /// The admin marker, if the rule is enabled.
    pub fn admin_marker(&self) -> Option<&str> {
        self.admin_email_marker
            .as_deref()
            .map(str::trim)
            .filter(|marker| !marker.is_empty())
    }

    pub fn api_delay(&self) -> Duration {
        Duration::from_millis(self.api_delay_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}
