//! Loading and indexing of preprocessed measurement tables.
//!
//! The input is the per-timestamp aggregate produced by the external data
//! loader: one row per (timestamp, benchmark) with the metric value, tagged
//! with the software version, injected issue, and severity level. Rows are
//! grouped by their (benchmark, issue, severity, version) key at load time so
//! the analysis loop gets O(1) access per combination instead of re-scanning
//! the table inside its triple-nested loop.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

/// Errors that can occur while loading a measurement table.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The table has no header row.
    #[error("measurement table is empty")]
    Empty,

    /// The header is missing a required column.
    #[error("missing required column '{0}' in header")]
    MissingColumn(&'static str),

    /// A data row has a different number of fields than the header.
    #[error("line {line}: expected {expected} fields, got {got}")]
    FieldCount {
        line: usize,
        expected: usize,
        got: usize,
    },

    /// A field could not be parsed as its column's type.
    #[error("line {line}: invalid value '{value}' in column '{column}'")]
    InvalidField {
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// Identifies one measured population: a benchmark under one injected issue,
/// severity level, and software version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleKey {
    pub benchmark: String,
    pub perf_issue: String,
    pub severity: u64,
    pub version: u8,
}

/// A loaded measurement table, indexed by sample key.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// (timestamp, metric value) rows per population, in file order.
    groups: HashMap<SampleKey, Vec<(i64, f64)>>,
    /// Benchmark names in first-seen order.
    benchmarks: Vec<String>,
    row_count: usize,
}

impl Dataset {
    /// Load a measurement table from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or any row fails to parse.
    pub fn load(path: &Path) -> Result<Dataset, DatasetError> {
        let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse a measurement table from CSV text.
    ///
    /// The first line must be a header naming at least the columns
    /// `timestamp,name,median_duration,version,perf_issue,severity`; column
    /// order does not matter and extra columns are ignored. Fields contain no
    /// quoting or embedded commas, so rows are split on commas directly.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing header, missing columns, or rows whose
    /// fields do not parse.
    pub fn parse(content: &str) -> Result<Dataset, DatasetError> {
        let mut lines = content.lines().enumerate();
        let (_, header) = lines.next().ok_or(DatasetError::Empty)?;

        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        let index_of = |name: &'static str| {
            columns
                .iter()
                .position(|c| *c == name)
                .ok_or(DatasetError::MissingColumn(name))
        };
        // The `count` column emitted by the preprocessing step is ignored.
        let timestamp_col = index_of("timestamp")?;
        let name_col = index_of("name")?;
        let value_col = index_of("median_duration")?;
        let version_col = index_of("version")?;
        let issue_col = index_of("perf_issue")?;
        let severity_col = index_of("severity")?;

        let mut dataset = Dataset::default();

        for (idx, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != columns.len() {
                return Err(DatasetError::FieldCount {
                    line: idx + 1,
                    expected: columns.len(),
                    got: fields.len(),
                });
            }

            let parse_field = |column: &'static str, col: usize| DatasetError::InvalidField {
                line: idx + 1,
                column,
                value: fields[col].to_string(),
            };

            let timestamp: i64 = fields[timestamp_col]
                .parse()
                .map_err(|_| parse_field("timestamp", timestamp_col))?;
            let value: f64 = fields[value_col]
                .parse()
                .map_err(|_| parse_field("median_duration", value_col))?;
            let version: u8 = fields[version_col]
                .parse()
                .map_err(|_| parse_field("version", version_col))?;
            let severity: u64 = fields[severity_col]
                .parse()
                .map_err(|_| parse_field("severity", severity_col))?;

            let key = SampleKey {
                benchmark: fields[name_col].to_string(),
                perf_issue: fields[issue_col].to_string(),
                severity,
                version,
            };

            if !dataset.benchmarks.iter().any(|b| b == &key.benchmark) {
                dataset.benchmarks.push(key.benchmark.clone());
            }
            dataset
                .groups
                .entry(key)
                .or_default()
                .push((timestamp, value));
            dataset.row_count += 1;
        }

        Ok(dataset)
    }

    /// All benchmark names, in first-seen order.
    pub fn benchmarks(&self) -> &[String] {
        &self.benchmarks
    }

    /// Total number of data rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Raw (timestamp, value) rows for one population, if present.
    pub fn rows(&self, key: &SampleKey) -> Option<&[(i64, f64)]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// The two version samples for one (benchmark, issue, severity)
    /// combination, with warmup and wind-down windows trimmed.
    ///
    /// Measurements before `warmup` are dropped, as are measurements after
    /// `min(max timestamp of v1, max timestamp of v2) - wind_down` — the
    /// wind-down window is anchored at whichever version terminated first.
    ///
    /// Returns None if either version has no rows at all; the returned
    /// samples may still be empty if trimming removed every row.
    pub fn trimmed_version_pair(
        &self,
        benchmark: &str,
        perf_issue: &str,
        severity: u64,
        warmup: i64,
        wind_down: i64,
    ) -> Option<(Vec<f64>, Vec<f64>)> {
        let key = |version| SampleKey {
            benchmark: benchmark.to_string(),
            perf_issue: perf_issue.to_string(),
            severity,
            version,
        };
        let v1 = self.rows(&key(1))?;
        let v2 = self.rows(&key(2))?;

        let max_t = |rows: &[(i64, f64)]| rows.iter().map(|&(t, _)| t).max();
        let end = max_t(v1)?.min(max_t(v2)?) - wind_down;

        let keep = |rows: &[(i64, f64)]| {
            rows.iter()
                .filter(|&&(t, _)| t >= warmup && t <= end)
                .map(|&(_, v)| v)
                .collect::<Vec<f64>>()
        };
        Some((keep(v1), keep(v2)))
    }
}
