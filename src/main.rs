use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use covdiff::filter::ClassFilter;
use covdiff::report::{JsonFormatter, ReportFormatter, TextFormatter};
use covdiff::{diff, loader};

/// covdiff — Structural comparison of two coverage reports.
///
/// Loads two reports produced over the same program execution (typically by
/// two different instrumentation strategies), diffs them by derived coverage
/// status, and exits non-zero when the coverage is not equivalent.
#[derive(Parser)]
#[command(name = "covdiff", version, about)]
struct Cli {
    /// Baseline report ("before").
    report_a: PathBuf,

    /// Candidate report ("after").
    report_b: PathBuf,

    /// Only compare classes whose fully-qualified name matches this regex.
    /// May be repeated; any match includes the class.
    #[arg(long)]
    include: Vec<String>,

    /// Skip classes whose fully-qualified name matches this regex.
    /// May be repeated; applied after --include.
    #[arg(long)]
    exclude: Vec<String>,

    /// Output style.
    #[arg(long, value_enum, default_value = "text")]
    output: Output,

    /// Print nothing when the reports are equivalent.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Output {
    Text,
    Json,
}

fn main() -> ExitCode {
    match run() {
        Ok(equivalent) => {
            if equivalent {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();

    let mut project_a = loader::load(&cli.report_a)
        .with_context(|| format!("Failed to load {}", cli.report_a.display()))?;
    let mut project_b = loader::load(&cli.report_b)
        .with_context(|| format!("Failed to load {}", cli.report_b.display()))?;

    let filter = ClassFilter::new(&cli.include, &cli.exclude).context("Invalid class filter")?;
    if !filter.is_empty() {
        project_a = filter.apply(&project_a);
        project_b = filter.apply(&project_b);
    }

    let report = diff::compare(&project_a, &project_b);

    if !(cli.quiet && report.is_empty()) {
        let formatter: &dyn ReportFormatter = match cli.output {
            Output::Text => &TextFormatter,
            Output::Json => &JsonFormatter,
        };
        print!("{}", formatter.format(&report));
    }

    Ok(report.is_empty())
}
