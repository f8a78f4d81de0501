use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use thiserror::Error;

/// Errors produced by the statistics engine.
#[derive(Debug, Error)]
pub enum StatsError {
    /// A statistic was requested over an empty sample.
    #[error("sample is empty; no statistic is defined over it")]
    EmptySample,

    /// The confidence level must lie strictly between 0 and 100 percent.
    #[error("confidence level must be in (0, 100), got {0}")]
    InvalidConfidenceLevel(f64),

    /// The reducer name was not one of the supported statistics.
    #[error("unknown reducer '{0}' (expected 'mean' or 'median')")]
    InvalidReducer(String),
}

/// The summary statistic applied to each bootstrap resample (and to raw
/// samples when computing point estimates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reducer {
    Mean,
    Median,
}

impl Reducer {
    /// Apply this reducer to a sample.
    ///
    /// # Errors
    ///
    /// Returns `StatsError::EmptySample` if the sample is empty.
    pub fn apply(&self, sample: &[f64]) -> Result<f64, StatsError> {
        match self {
            Reducer::Mean => mean(sample),
            Reducer::Median => median(sample),
        }
    }
}

impl FromStr for Reducer {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(Reducer::Mean),
            "median" => Ok(Reducer::Median),
            other => Err(StatsError::InvalidReducer(other.to_string())),
        }
    }
}

impl fmt::Display for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reducer::Mean => write!(f, "mean"),
            Reducer::Median => write!(f, "median"),
        }
    }
}

/// Arithmetic mean of a sample.
///
/// # Errors
///
/// Returns `StatsError::EmptySample` if the sample is empty.
pub fn mean(sample: &[f64]) -> Result<f64, StatsError> {
    if sample.is_empty() {
        return Err(StatsError::EmptySample);
    }
    Ok(Statistics::mean(sample))
}

/// Median of a sample (average of the two middle order statistics for
/// even-sized samples).
///
/// # Errors
///
/// Returns `StatsError::EmptySample` if the sample is empty.
pub fn median(sample: &[f64]) -> Result<f64, StatsError> {
    if sample.is_empty() {
        return Err(StatsError::EmptySample);
    }
    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 1 {
        Ok(sorted[mid])
    } else {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Percentile of an already-sorted slice, using linear interpolation between
/// order statistics. `pct` is in percent (0 to 100).
pub(crate) fn percentile_of_sorted(sorted: &[f64], pct: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let below = rank.floor() as usize;
    let frac = rank - below as f64;
    // Exact hit on an order statistic; also avoids inf - inf when the tail of
    // the distribution is not finite.
    if frac == 0.0 {
        return sorted[below];
    }
    sorted[below] + (sorted[below + 1] - sorted[below]) * frac
}

mod bootstrap;
mod dispersion;
mod interval;

pub use bootstrap::Resampler;
pub use dispersion::{
    bootstrap_standard_error_of_median, coefficient_of_variation,
    relative_ci_width, relative_median_absolute_deviation,
};
pub use interval::{percentile_interval, ConfidenceInterval};
