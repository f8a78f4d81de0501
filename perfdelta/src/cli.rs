//! Command-line interface for perfdelta.

use crate::config::Config;
use clap::Parser;
use perfdelta_core::StatsError;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "perfdelta")]
#[command(about = "Bootstrap-based detection of performance changes between two software versions")]
#[command(version)]
pub struct Cli {
    /// Path to the preprocessed measurement table (CSV)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Where to write the result table (CSV)
    #[arg(short, long, default_value = "results.csv")]
    pub output: PathBuf,

    /// Also write the result table as JSON next to the CSV
    #[arg(long)]
    pub json: bool,

    /// Compute per-version RCIW variability instead of change detection
    #[arg(long)]
    pub variability: bool,

    /// Number of bootstrap resamples per confidence interval
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Confidence level in percent, strictly between 0 and 100
    #[arg(long)]
    pub confidence_level: Option<f64>,

    /// Statistic applied per resample: 'mean' or 'median'
    #[arg(long)]
    pub reducer: Option<String>,

    /// Seed for the bootstrap random generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path to config file (defaults to .perfdelta.toml when present).
    /// Unlike the default, an explicitly given path must exist.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply CLI overrides to the configuration.
    ///
    /// CLI arguments take precedence over config file values.
    /// Only non-None optional values will override the config.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::InvalidReducer` if `--reducer` names an unknown
    /// statistic.
    pub fn apply_to_config(&self, config: &mut Config) -> Result<(), StatsError> {
        if let Some(iterations) = self.iterations {
            config.bootstrap.iterations = iterations;
        }

        if let Some(confidence_level) = self.confidence_level {
            config.bootstrap.confidence_level = confidence_level;
        }

        if let Some(ref reducer) = self.reducer {
            config.bootstrap.reducer = reducer.parse()?;
        }

        if let Some(seed) = self.seed {
            config.bootstrap.seed = seed;
        }

        Ok(())
    }
}
