use std::io::{self, Write};

use colored::Colorize;

use super::{PerfChangeResult, ReportError, Reporter, Verdict};

/// A reporter that prints the change-detection result table to the terminal.
#[derive(Debug, Clone, Default)]
pub struct TerminalReporter {
    /// Whether to use colors in output (defaults to true).
    use_colors: bool,
}

impl TerminalReporter {
    /// Create a new terminal reporter with default settings.
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Create a terminal reporter with color output disabled.
    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    /// Format a confidence interval column.
    fn format_ci(result: &PerfChangeResult) -> String {
        format!("[{:.4}, {:.4}]", result.ci_lower, result.ci_upper)
    }

    /// Plain text for the result column. A ratio above 1.0 means version 2 is
    /// slower (the metric is duration-like).
    fn result_text(result: &PerfChangeResult) -> &'static str {
        match result.verdict {
            Verdict::ChangeFound if result.ratio > 1.0 => "slower",
            Verdict::ChangeFound => "faster",
            Verdict::NoChange => "no change",
            Verdict::Degenerate => "degenerate",
        }
    }

    /// Format the result column with appropriate coloring.
    fn format_result(&self, result: &PerfChangeResult) -> String {
        let text = Self::result_text(result);
        if !self.use_colors {
            return text.to_string();
        }
        match result.verdict {
            Verdict::ChangeFound if result.ratio > 1.0 => text.red().bold().to_string(),
            Verdict::ChangeFound => text.green().bold().to_string(),
            Verdict::NoChange => text.yellow().to_string(),
            Verdict::Degenerate => text.yellow().to_string(),
        }
    }

    /// Print the table header.
    fn print_header(&self, writer: &mut impl Write) -> io::Result<()> {
        writeln!(writer)?;
        let header = format!(
            "{:<36} {:<14} {:>8} {:>10} {:>22} {:>12}",
            "Benchmark", "Issue", "Severity", "Ratio", "CI", "Result"
        );
        if self.use_colors {
            writeln!(writer, "{}", header.bold())?;
        } else {
            writeln!(writer, "{}", header)?;
        }
        writeln!(writer, "{}", "-".repeat(108))?;
        Ok(())
    }

    /// Print a single result row.
    fn print_row(&self, writer: &mut impl Write, result: &PerfChangeResult) -> io::Result<()> {
        // Truncate on char boundaries; benchmark names come straight from
        // the input table and are not guaranteed to be ASCII.
        let name = if result.benchmark.chars().count() > 34 {
            let prefix: String = result.benchmark.chars().take(31).collect();
            format!("{}...", prefix)
        } else {
            result.benchmark.clone()
        };

        let formatted = self.format_result(result);

        // Pad manually: ANSI escape codes confuse format!'s width specifier.
        let visible_len = Self::result_text(result).len();
        let padding = 12_usize.saturating_sub(visible_len);

        writeln!(
            writer,
            "{:<36} {:<14} {:>8} {:>10.4} {:>22} {:>width$}{}",
            name,
            result.perf_issue,
            result.severity,
            result.ratio,
            Self::format_ci(result),
            "",
            formatted,
            width = padding,
        )?;
        Ok(())
    }

    /// Print the summary footer.
    fn print_summary(
        &self,
        writer: &mut impl Write,
        results: &[PerfChangeResult],
    ) -> io::Result<()> {
        let mut changed = 0;
        let mut unchanged = 0;
        let mut degenerate = 0;

        for result in results {
            match result.verdict {
                Verdict::ChangeFound => changed += 1,
                Verdict::NoChange => unchanged += 1,
                Verdict::Degenerate => degenerate += 1,
            }
        }

        writeln!(writer)?;
        writeln!(writer, "{}", "-".repeat(108))?;

        let summary_label = "Summary:";
        if self.use_colors {
            write!(writer, "{} ", summary_label.bold())?;
        } else {
            write!(writer, "{} ", summary_label)?;
        }

        let changed_text = format!("{} changed", changed);
        let unchanged_text = format!("{} unchanged", unchanged);
        let degenerate_text = format!("{} degenerate", degenerate);

        if self.use_colors {
            writeln!(
                writer,
                "{}, {}, {}",
                changed_text.red(),
                unchanged_text.green(),
                degenerate_text.yellow()
            )?;
        } else {
            writeln!(
                writer,
                "{}, {}, {}",
                changed_text, unchanged_text, degenerate_text
            )?;
        }

        writeln!(writer)?;
        Ok(())
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, results: &[PerfChangeResult]) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();

        self.print_header(&mut writer)?;

        for result in results {
            self.print_row(&mut writer, result)?;
        }

        self.print_summary(&mut writer, results)?;

        Ok(())
    }
}
