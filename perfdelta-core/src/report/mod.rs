use serde::Serialize;
use thiserror::Error;

use crate::stats::ConfidenceInterval;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Significance verdict for one (benchmark, issue, severity) combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The confidence interval excludes the neutral ratio 1.0.
    ChangeFound,
    /// The confidence interval contains 1.0.
    NoChange,
    /// The point ratio or a CI bound is NaN or infinite (e.g. a
    /// bootstrap-reachable zero median in the denominator sample). Surfaced
    /// as its own state instead of being folded into a boolean, where IEEE
    /// NaN comparisons would silently report a change.
    Degenerate,
}

impl Verdict {
    /// Derive the verdict from a point ratio and its confidence interval.
    pub fn from_estimate(ratio: f64, ci: &ConfidenceInterval) -> Verdict {
        if !ratio.is_finite() || ci.is_degenerate() {
            Verdict::Degenerate
        } else if ci.contains(1.0) {
            Verdict::NoChange
        } else {
            Verdict::ChangeFound
        }
    }
}

/// One result row of the change-detection analysis.
///
/// The ratio is version 2 over version 1, so a ratio above 1.0 means version 2
/// is slower for duration-like metrics. Created once per combination and never
/// mutated.
#[derive(Debug, Clone, Serialize)]
pub struct PerfChangeResult {
    pub benchmark: String,
    pub perf_issue: String,
    pub severity: u64,
    /// Point estimate: reducer(v2 sample) / reducer(v1 sample).
    pub ratio: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub verdict: Verdict,
}

impl PerfChangeResult {
    /// Whether a statistically significant change was found.
    pub fn change_found(&self) -> bool {
        self.verdict == Verdict::ChangeFound
    }

    /// Whether the result is degenerate (non-finite ratio or CI bound).
    pub fn is_degenerate(&self) -> bool {
        self.verdict == Verdict::Degenerate
    }
}

/// One result row of the variability analysis: the relative confidence
/// interval width of a single benchmark/version sample.
#[derive(Debug, Clone, Serialize)]
pub struct VariabilityResult {
    pub benchmark: String,
    pub perf_issue: String,
    pub severity: u64,
    pub version: u8,
    pub rciw: f64,
}

pub trait Reporter: Send + Sync {
    fn report(&self, results: &[PerfChangeResult]) -> Result<(), ReportError>;
}

mod terminal;
pub use terminal::TerminalReporter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_change_found() {
        let ci = ConfidenceInterval { lower: 1.3, upper: 1.8 };
        assert_eq!(Verdict::from_estimate(1.5, &ci), Verdict::ChangeFound);
    }

    #[test]
    fn test_verdict_no_change() {
        let ci = ConfidenceInterval { lower: 0.95, upper: 1.05 };
        assert_eq!(Verdict::from_estimate(1.01, &ci), Verdict::NoChange);
    }

    #[test]
    fn test_verdict_boundary_counts_as_no_change() {
        // contains() is inclusive, so 1.0 sitting exactly on a bound is still
        // inside the interval.
        let ci = ConfidenceInterval { lower: 1.0, upper: 1.4 };
        assert_eq!(Verdict::from_estimate(1.2, &ci), Verdict::NoChange);
    }

    #[test]
    fn test_verdict_degenerate_on_nan_bound() {
        let ci = ConfidenceInterval { lower: 0.9, upper: f64::NAN };
        assert_eq!(Verdict::from_estimate(1.0, &ci), Verdict::Degenerate);
    }

    #[test]
    fn test_verdict_degenerate_on_infinite_ratio() {
        let ci = ConfidenceInterval { lower: 0.9, upper: 1.1 };
        assert_eq!(
            Verdict::from_estimate(f64::INFINITY, &ci),
            Verdict::Degenerate
        );
    }

    #[test]
    fn test_result_row_serializes_flat() {
        let row = PerfChangeResult {
            benchmark: "bookings".to_string(),
            perf_issue: "basic-auth".to_string(),
            severity: 64,
            ratio: 1.42,
            ci_lower: 1.31,
            ci_upper: 1.55,
            verdict: Verdict::ChangeFound,
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["benchmark"], "bookings");
        assert_eq!(json["severity"], 64);
        assert_eq!(json["verdict"], "change_found");
    }
}
