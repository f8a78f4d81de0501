//! Result table persistence.
//!
//! The CSV writers emit the same field rules the dataset loader assumes:
//! plain comma separation, no quoting. Benchmark and issue identifiers in
//! this domain never contain commas.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use perfdelta_core::{PerfChangeResult, VariabilityResult};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write the change-detection result table as CSV.
pub fn write_results_csv(path: &Path, results: &[PerfChangeResult]) -> Result<(), OutputError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_results(&mut writer, results)?;
    writer.flush()?;
    Ok(())
}

/// Write the change-detection result table to any writer.
pub fn write_results(writer: &mut impl Write, results: &[PerfChangeResult]) -> io::Result<()> {
    writeln!(
        writer,
        "name,perf_issue,severity,ratio,ci_lower,ci_upper,change_found,degenerate"
    )?;
    for r in results {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{}",
            r.benchmark,
            r.perf_issue,
            r.severity,
            r.ratio,
            r.ci_lower,
            r.ci_upper,
            r.change_found(),
            r.is_degenerate(),
        )?;
    }
    Ok(())
}

/// Write the variability result table as CSV.
pub fn write_variability_csv(
    path: &Path,
    results: &[VariabilityResult],
) -> Result<(), OutputError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_variability(&mut writer, results)?;
    writer.flush()?;
    Ok(())
}

/// Write the variability result table to any writer.
pub fn write_variability(
    writer: &mut impl Write,
    results: &[VariabilityResult],
) -> io::Result<()> {
    writeln!(writer, "name,perf_issue,severity,version,rciw")?;
    for r in results {
        writeln!(
            writer,
            "{},{},{},{},{}",
            r.benchmark, r.perf_issue, r.severity, r.version, r.rciw
        )?;
    }
    Ok(())
}

/// Write any serializable result table as pretty-printed JSON.
pub fn write_json<T: serde::Serialize>(path: &Path, results: &[T]) -> Result<(), OutputError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, results)?;
    writer.flush()?;
    Ok(())
}
