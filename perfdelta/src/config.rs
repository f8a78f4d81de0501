//! Configuration loading for perfdelta.
//!
//! Supports loading configuration from TOML files, with sensible defaults
//! for all settings.

use anyhow::{Context, Result};
use perfdelta_core::Reducer;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for perfdelta.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings for bootstrap resampling.
    pub bootstrap: BootstrapConfig,
    /// The experiment grid the input data was collected over.
    pub experiment: ExperimentConfig,
    /// Settings for trimming the warmup and wind-down windows.
    pub trim: TrimConfig,
}

/// Configuration for bootstrap resampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Number of bootstrap resamples per confidence interval.
    pub iterations: usize,
    /// Confidence level in percent, strictly between 0 and 100.
    pub confidence_level: f64,
    /// Statistic applied per resample: mean or median.
    pub reducer: Reducer,
    /// Seed for the random generator. Fixed so repeated runs over the same
    /// data produce identical intervals.
    pub seed: u64,
}

/// The experiment grid: which injected issues and severity levels the
/// measurement table covers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Injected performance issue identifiers.
    pub perf_issues: Vec<String>,
    /// Severity levels of the injected issues.
    pub severities: Vec<u64>,
}

/// Configuration for trimming measurement windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    /// Measurements earlier than this many time units are discarded (warmup).
    pub warmup_secs: i64,
    /// Measurements within this many time units of the earlier-terminating
    /// version's end are discarded (wind-down).
    pub wind_down_secs: i64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            confidence_level: 99.0,
            reducer: Reducer::Median,
            seed: 42,
        }
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            perf_issues: vec![
                "basic-auth".to_string(),
                "clean-path".to_string(),
                "request-id".to_string(),
            ],
            severities: vec![0, 1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 2048],
        }
    }
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            warmup_secs: 60,
            wind_down_secs: 60,
        }
    }
}

/// Default configuration file name.
const DEFAULT_CONFIG_FILE: &str = ".perfdelta.toml";

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from the given path, or use defaults if the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be parsed.
    pub fn load_or_default(path: &Path) -> Result<Config> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from the specified path, or try the default
    /// location (`.perfdelta.toml`) falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the specified file cannot be read or parsed.
    pub fn load_from(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(p) => Self::load(p),
            None => Self::load_or_default(Path::new(DEFAULT_CONFIG_FILE)),
        }
    }
}
