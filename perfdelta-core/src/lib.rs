//! Core statistics and result types for perfdelta.
//!
//! This crate provides the bootstrap resampling engine, confidence interval
//! and dispersion reducers, and the result/reporting types shared between the
//! perfdelta CLI and any downstream consumer of its result tables.

pub mod report;
pub mod stats;

// Re-export main types for convenience
pub use report::{
    PerfChangeResult, ReportError, Reporter, TerminalReporter, VariabilityResult, Verdict,
};
pub use stats::{
    percentile_interval, ConfidenceInterval, Reducer, Resampler, StatsError,
};
