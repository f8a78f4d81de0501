//! The driving procedure: iterates the experiment grid and turns version
//! sample pairs into performance-change verdicts.

use perfdelta_core::stats::{
    percentile_interval, relative_ci_width, Reducer, Resampler, StatsError,
};
use perfdelta_core::{PerfChangeResult, VariabilityResult, Verdict};
use thiserror::Error;

use crate::config::Config;
use crate::dataset::Dataset;

/// Errors that can occur while driving the analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The analysis configuration is invalid (confidence level outside
    /// (0, 100)). Checked once up front; it would fail every combination
    /// identically.
    #[error("invalid analysis configuration: {0}")]
    InvalidConfig(#[from] StatsError),

    /// A statistic unexpectedly failed for one combination.
    #[error("statistics failed for {benchmark} / {perf_issue} / severity {severity}: {source}")]
    Stats {
        benchmark: String,
        perf_issue: String,
        severity: u64,
        #[source]
        source: StatsError,
    },
}

/// Batch analyzer over a loaded measurement table.
///
/// Combinations with missing or fully trimmed samples are skipped with a
/// warning on stderr rather than aborting the batch; one bad combination does
/// not invalidate the rest of an overnight run.
#[derive(Debug, Clone)]
pub struct Analyzer {
    reducer: Reducer,
    iterations: usize,
    confidence_level: f64,
    seed: u64,
    warmup: i64,
    wind_down: i64,
    perf_issues: Vec<String>,
    severities: Vec<u64>,
}

impl Analyzer {
    /// Build an analyzer from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            reducer: config.bootstrap.reducer,
            iterations: config.bootstrap.iterations,
            confidence_level: config.bootstrap.confidence_level,
            seed: config.bootstrap.seed,
            warmup: config.trim.warmup_secs,
            wind_down: config.trim.wind_down_secs,
            perf_issues: config.experiment.perf_issues.clone(),
            severities: config.experiment.severities.clone(),
        }
    }

    fn validate(&self) -> Result<(), AnalyzerError> {
        let cl = self.confidence_level;
        if !(cl > 0.0 && cl < 100.0) {
            return Err(StatsError::InvalidConfidenceLevel(cl).into());
        }
        Ok(())
    }

    /// Run change detection over every (issue, severity, benchmark)
    /// combination: point ratio, bootstrap CI of the ratio, and verdict.
    ///
    /// Each combination gets its own resampler seeded from (seed, key), so
    /// the output is reproducible and independent of iteration order.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a statistic fails
    /// on a non-empty sample.
    pub fn detect_changes(&self, dataset: &Dataset) -> Result<Vec<PerfChangeResult>, AnalyzerError> {
        self.validate()?;

        let mut results = Vec::new();
        for perf_issue in &self.perf_issues {
            for &severity in &self.severities {
                for benchmark in dataset.benchmarks() {
                    let Some((v1, v2)) = self.samples(dataset, benchmark, perf_issue, severity)
                    else {
                        continue;
                    };

                    let stats_err = |source| AnalyzerError::Stats {
                        benchmark: benchmark.clone(),
                        perf_issue: perf_issue.clone(),
                        severity,
                        source,
                    };

                    let ratio =
                        self.reducer.apply(&v2).map_err(stats_err)? / self.reducer.apply(&v1).map_err(stats_err)?;

                    let mut resampler =
                        Resampler::for_key(self.seed, (benchmark.as_str(), perf_issue.as_str(), severity));
                    let dist = resampler
                        .ratio_distribution(&v1, &v2, self.reducer, self.iterations)
                        .map_err(stats_err)?;
                    let ci = percentile_interval(&dist, self.confidence_level).map_err(stats_err)?;

                    results.push(PerfChangeResult {
                        benchmark: benchmark.clone(),
                        perf_issue: perf_issue.clone(),
                        severity,
                        ratio,
                        ci_lower: ci.lower,
                        ci_upper: ci.upper,
                        verdict: Verdict::from_estimate(ratio, &ci),
                    });
                }
            }
        }
        Ok(results)
    }

    /// Run the variability analysis: one relative-CI-width row per
    /// (issue, severity, benchmark, version).
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a statistic fails
    /// on a non-empty sample.
    pub fn variability(&self, dataset: &Dataset) -> Result<Vec<VariabilityResult>, AnalyzerError> {
        self.validate()?;

        let mut results = Vec::new();
        for perf_issue in &self.perf_issues {
            for &severity in &self.severities {
                for benchmark in dataset.benchmarks() {
                    let Some((v1, v2)) = self.samples(dataset, benchmark, perf_issue, severity)
                    else {
                        continue;
                    };

                    for (version, sample) in [(1u8, &v1), (2u8, &v2)] {
                        let mut resampler = Resampler::for_key(
                            self.seed,
                            (benchmark.as_str(), perf_issue.as_str(), severity, version),
                        );
                        let rciw = relative_ci_width(
                            &mut resampler,
                            sample,
                            self.reducer,
                            self.iterations,
                            self.confidence_level,
                        )
                        .map_err(|source| AnalyzerError::Stats {
                            benchmark: benchmark.clone(),
                            perf_issue: perf_issue.clone(),
                            severity,
                            source,
                        })?;

                        results.push(VariabilityResult {
                            benchmark: benchmark.clone(),
                            perf_issue: perf_issue.clone(),
                            severity,
                            version,
                            rciw,
                        });
                    }
                }
            }
        }
        Ok(results)
    }

    /// Trimmed version samples for one combination, or None (with a warning)
    /// if the combination is absent or trimming left either side empty.
    fn samples(
        &self,
        dataset: &Dataset,
        benchmark: &str,
        perf_issue: &str,
        severity: u64,
    ) -> Option<(Vec<f64>, Vec<f64>)> {
        let Some((v1, v2)) = dataset.trimmed_version_pair(
            benchmark,
            perf_issue,
            severity,
            self.warmup,
            self.wind_down,
        ) else {
            eprintln!(
                "warning: no data for {benchmark} / {perf_issue} / severity {severity}, skipping"
            );
            return None;
        };
        if v1.is_empty() || v2.is_empty() {
            eprintln!(
                "warning: empty sample after trimming for {benchmark} / {perf_issue} / severity {severity}, skipping"
            );
            return None;
        }
        Some((v1, v2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    /// Build a table with one benchmark measured across the full run length,
    /// with v2 values scaled by `factor` and a bit of deterministic jitter.
    fn synthetic_table(factor: f64) -> String {
        let mut table =
            String::from("timestamp,name,count,median_duration,version,perf_issue,severity\n");
        for t in 0..300 {
            let jitter = 0.01 * (t % 7) as f64;
            table.push_str(&format!(
                "{t},bookings,10,{:.4},1,basic-auth,64\n",
                10.0 + jitter
            ));
            table.push_str(&format!(
                "{t},bookings,10,{:.4},2,basic-auth,64\n",
                (10.0 + jitter) * factor
            ));
        }
        table
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.bootstrap.iterations = 1000;
        config.experiment.perf_issues = vec!["basic-auth".to_string()];
        config.experiment.severities = vec![64];
        config
    }

    #[test]
    fn test_detects_clear_slowdown() {
        let dataset = Dataset::parse(&synthetic_table(2.0)).unwrap();
        let analyzer = Analyzer::from_config(&test_config());

        let results = analyzer.detect_changes(&dataset).unwrap();
        assert_eq!(results.len(), 1);

        let result = &results[0];
        assert_eq!(result.verdict, Verdict::ChangeFound);
        assert!(result.change_found());
        assert!((result.ratio - 2.0).abs() < 0.05);
        assert!(result.ci_lower > 1.0);
    }

    #[test]
    fn test_no_change_for_identical_versions() {
        let dataset = Dataset::parse(&synthetic_table(1.0)).unwrap();
        let analyzer = Analyzer::from_config(&test_config());

        let results = analyzer.detect_changes(&dataset).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].verdict, Verdict::NoChange);
        assert!(!results[0].change_found());
    }

    #[test]
    fn test_determinism_across_runs() {
        let dataset = Dataset::parse(&synthetic_table(1.3)).unwrap();
        let analyzer = Analyzer::from_config(&test_config());

        let first = analyzer.detect_changes(&dataset).unwrap();
        let second = analyzer.detect_changes(&dataset).unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.ratio, b.ratio);
            assert_eq!(a.ci_lower, b.ci_lower);
            assert_eq!(a.ci_upper, b.ci_upper);
            assert_eq!(a.verdict, b.verdict);
        }
    }

    #[test]
    fn test_missing_combination_is_skipped() {
        let dataset = Dataset::parse(&synthetic_table(1.5)).unwrap();
        let mut config = test_config();
        // Severity 2048 has no data; only severity 64 produces a row.
        config.experiment.severities = vec![64, 2048];
        let analyzer = Analyzer::from_config(&config);

        let results = analyzer.detect_changes(&dataset).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].severity, 64);
    }

    #[test]
    fn test_invalid_confidence_level_aborts() {
        let dataset = Dataset::parse(&synthetic_table(1.0)).unwrap();
        let mut config = test_config();
        config.bootstrap.confidence_level = 120.0;
        let analyzer = Analyzer::from_config(&config);

        let result = analyzer.detect_changes(&dataset);
        assert!(matches!(result, Err(AnalyzerError::InvalidConfig(_))));
    }

    #[test]
    fn test_degenerate_zero_denominator() {
        // Version 1 is all zeros: the ratio and every bootstrap ratio are
        // non-finite, which must surface as Degenerate, not ChangeFound.
        let mut table =
            String::from("timestamp,name,count,median_duration,version,perf_issue,severity\n");
        for t in 0..200 {
            table.push_str(&format!("{t},bookings,10,0.0,1,basic-auth,64\n"));
            table.push_str(&format!("{t},bookings,10,5.0,2,basic-auth,64\n"));
        }
        let dataset = Dataset::parse(&table).unwrap();
        let analyzer = Analyzer::from_config(&test_config());

        let results = analyzer.detect_changes(&dataset).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].verdict, Verdict::Degenerate);
        assert!(!results[0].change_found());
    }

    #[test]
    fn test_variability_rows_per_version() {
        let dataset = Dataset::parse(&synthetic_table(1.2)).unwrap();
        let analyzer = Analyzer::from_config(&test_config());

        let rows = analyzer.variability(&dataset).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].version, 1);
        assert_eq!(rows[1].version, 2);
        for row in &rows {
            assert!(row.rciw.is_finite());
            assert!(row.rciw >= 0.0);
        }
    }
}
