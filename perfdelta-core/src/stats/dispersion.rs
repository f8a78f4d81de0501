//! Scale-free dispersion metrics.
//!
//! All metrics here are normalized by the sample's own center, so variability
//! can be compared across benchmarks with different absolute magnitudes.

use statrs::statistics::Statistics;

use super::{median, percentile_interval, Reducer, Resampler, StatsError};

/// Coefficient of variation: population standard deviation (n denominator)
/// divided by the mean.
///
/// # Errors
///
/// Returns `StatsError::EmptySample` if the sample is empty.
pub fn coefficient_of_variation(sample: &[f64]) -> Result<f64, StatsError> {
    if sample.is_empty() {
        return Err(StatsError::EmptySample);
    }
    Ok(Statistics::population_std_dev(sample) / Statistics::mean(sample))
}

/// Relative median absolute deviation: `median(|x - median(x)|) / median(x)`.
///
/// # Errors
///
/// Returns `StatsError::EmptySample` if the sample is empty.
pub fn relative_median_absolute_deviation(sample: &[f64]) -> Result<f64, StatsError> {
    let m = median(sample)?;
    let deviations: Vec<f64> = sample.iter().map(|x| (x - m).abs()).collect();
    Ok(median(&deviations)? / m)
}

/// Relative confidence interval width: the width of the percentile bootstrap
/// interval of `reducer`, divided by `reducer` of the raw sample.
///
/// # Errors
///
/// Returns `StatsError::EmptySample` for an empty sample, or
/// `StatsError::InvalidConfidenceLevel` for a confidence level outside
/// (0, 100).
pub fn relative_ci_width(
    resampler: &mut Resampler,
    sample: &[f64],
    reducer: Reducer,
    iterations: usize,
    confidence_level: f64,
) -> Result<f64, StatsError> {
    let center = reducer.apply(sample)?;
    let dist = resampler.distribution(sample, reducer, iterations)?;
    let ci = percentile_interval(&dist, confidence_level)?;
    Ok(ci.width() / center)
}

/// Bootstrap standard error of the median: the sample standard deviation
/// (n - 1 denominator) of the bootstrap distribution of the median.
///
/// # Errors
///
/// Returns `StatsError::EmptySample` if the sample is empty.
pub fn bootstrap_standard_error_of_median(
    resampler: &mut Resampler,
    sample: &[f64],
    iterations: usize,
) -> Result<f64, StatsError> {
    let dist = resampler.distribution(sample, Reducer::Median, iterations)?;
    Ok(Statistics::std_dev(&dist))
}
