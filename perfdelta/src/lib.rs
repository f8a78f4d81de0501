//! perfdelta: bootstrap-based performance-change detection.
//!
//! This library drives the statistics engine in `perfdelta-core` over a
//! preprocessed measurement table: for every (benchmark, issue, severity)
//! combination it compares the two software versions' latency samples and
//! records a ratio estimate, a bootstrap confidence interval, and a verdict.

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod output;

// Re-export core types for convenience
pub use perfdelta_core::report::{
    PerfChangeResult, ReportError, Reporter, TerminalReporter, VariabilityResult, Verdict,
};
pub use perfdelta_core::stats::{ConfidenceInterval, Reducer, Resampler, StatsError};

// Re-export main types from this crate
pub use analyzer::{Analyzer, AnalyzerError};
pub use cli::Cli;
pub use config::Config;
pub use dataset::{Dataset, DatasetError, SampleKey};
pub use output::OutputError;
