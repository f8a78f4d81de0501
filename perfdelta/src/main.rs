use anyhow::{Context, Result};
use clap::Parser;
use perfdelta::{output, Analyzer, Cli, Config, Dataset, Reporter, TerminalReporter};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config and apply CLI overrides. An explicit --config path must
    // exist; only the default location silently falls back to defaults.
    let mut config = Config::load_from(cli.config.as_deref())?;
    cli.apply_to_config(&mut config)
        .context("Invalid command-line override")?;

    if cli.verbose {
        eprintln!("Configuration: {:?}", config);
    }

    // 1. Load the measurement table
    eprintln!("Loading measurements...");
    let dataset = Dataset::load(&cli.input)
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;

    if cli.verbose {
        eprintln!(
            "{} rows across {} benchmarks",
            dataset.row_count(),
            dataset.benchmarks().len()
        );
    }

    let analyzer = Analyzer::from_config(&config);

    if cli.variability {
        // 2a. Variability analysis: per-version RCIW rows
        eprintln!("Computing RCIW variability...");
        let rows = analyzer
            .variability(&dataset)
            .context("Variability analysis failed")?;

        output::write_variability_csv(&cli.output, &rows)
            .with_context(|| format!("Failed to write {}", cli.output.display()))?;
        if cli.json {
            let json_path = cli.output.with_extension("json");
            output::write_json(&json_path, &rows)
                .with_context(|| format!("Failed to write {}", json_path.display()))?;
        }
        eprintln!("Wrote {} rows to {}", rows.len(), cli.output.display());
    } else {
        // 2b. Change detection
        eprintln!("Detecting performance changes...");
        let results = analyzer
            .detect_changes(&dataset)
            .context("Change detection failed")?;

        // 3. Report results
        let reporter = TerminalReporter::new();
        reporter.report(&results)?;

        output::write_results_csv(&cli.output, &results)
            .with_context(|| format!("Failed to write {}", cli.output.display()))?;
        if cli.json {
            let json_path = cli.output.with_extension("json");
            output::write_json(&json_path, &results)
                .with_context(|| format!("Failed to write {}", json_path.display()))?;
        }
        eprintln!("Wrote {} rows to {}", results.len(), cli.output.display());
    }

    Ok(())
}
