use serde::Serialize;

use super::{percentile_of_sorted, StatsError};

/// Two-sided percentile confidence interval over a bootstrap distribution.
///
/// For a ratio-of-statistics distribution both bounds are themselves ratios
/// and may be any positive real; no upper bound is assumed. Bounds may also be
/// non-finite when the distribution contains NaN or infinity (see
/// [`ConfidenceInterval::is_degenerate`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Whether `x` lies inside the interval, inclusive on both ends.
    ///
    /// Follows IEEE comparison semantics: if `x` or either bound is NaN this
    /// returns false. Callers deciding significance from a NaN-bounded
    /// interval should check [`is_degenerate`](Self::is_degenerate) first
    /// rather than read a "change found" verdict out of the false result.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.lower && x <= self.upper
    }

    /// Whether either bound is NaN or infinite.
    pub fn is_degenerate(&self) -> bool {
        !self.lower.is_finite() || !self.upper.is_finite()
    }

    /// Absolute width of the interval.
    pub fn width(&self) -> f64 {
        (self.upper - self.lower).abs()
    }
}

/// Two-sided percentile interval of a bootstrap distribution at the given
/// confidence level (in percent).
///
/// The cut points are the `(100 - cl) / 2` and `cl + (100 - cl) / 2`
/// percentiles of the distribution, with linear interpolation between order
/// statistics.
///
/// # Errors
///
/// Returns `StatsError::EmptySample` if `distribution` is empty, or
/// `StatsError::InvalidConfidenceLevel` if `confidence_level` is not strictly
/// between 0 and 100.
pub fn percentile_interval(
    distribution: &[f64],
    confidence_level: f64,
) -> Result<ConfidenceInterval, StatsError> {
    if distribution.is_empty() {
        return Err(StatsError::EmptySample);
    }
    if !(confidence_level > 0.0 && confidence_level < 100.0) {
        return Err(StatsError::InvalidConfidenceLevel(confidence_level));
    }

    let lower_pct = (100.0 - confidence_level) / 2.0;
    let upper_pct = confidence_level + lower_pct;

    let mut sorted = distribution.to_vec();
    sorted.sort_by(f64::total_cmp);

    Ok(ConfidenceInterval {
        lower: percentile_of_sorted(&sorted, lower_pct),
        upper: percentile_of_sorted(&sorted, upper_pct),
    })
}
