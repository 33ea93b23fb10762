//! Configuration management
//!
//! Handles loading and validating demo configuration from TOML files.
//! A missing config file is not an error: every field has a default, so the
//! demo runs with no file at all (ports and bounds fall back to the fixed
//! values below, the way the original read system properties).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub exporter: ExporterConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Scrape endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExporterConfig {
    /// Port for the direct prometheus-client endpoint
    #[serde(default = "default_client_port")]
    pub client_port: u16,
    /// Port for the metrics-facade endpoint
    #[serde(default = "default_facade_port")]
    pub facade_port: u16,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            client_port: default_client_port(),
            facade_port: default_facade_port(),
        }
    }
}

/// Evaluation loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DriverConfig {
    /// Lower bound (inclusive) for the generated monthly salary
    #[serde(default = "default_salary_min")]
    pub salary_min: i64,
    /// Upper bound (exclusive) for the generated monthly salary
    #[serde(default = "default_salary_max")]
    pub salary_max: i64,
    /// Scale for the power-law pause between iterations, in milliseconds
    #[serde(default = "default_pause_base_ms")]
    pub pause_base_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            salary_min: default_salary_min(),
            salary_max: default_salary_max(),
            pause_base_ms: default_pause_base_ms(),
        }
    }
}

/// Decision model source
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ModelConfig {
    /// Path to a model JSON file; absent means the bundled model
    #[serde(default)]
    pub path: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format: "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_client_port() -> u16 { 19090 }
fn default_facade_port() -> u16 { 29090 }
fn default_salary_min() -> i64 { 1000 }
fn default_salary_max() -> i64 { 100_000 / 12 }
fn default_pause_base_ms() -> u64 { 10 }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Config::default();
            config.validate()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| "Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.driver.salary_min >= self.driver.salary_max {
            anyhow::bail!("salary_min must be < salary_max");
        }
        if self.driver.pause_base_ms == 0 {
            anyhow::bail!("pause_base_ms must be > 0");
        }
        if self.exporter.client_port == self.exporter.facade_port {
            anyhow::bail!("client_port and facade_port must differ");
        }
        Ok(())
    }
}
