use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use locz::{Locz, Outcome, RunReport};
use locz_cli::resolve_config;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Generate C# enums and .resx resources from *.loc.csv translation tables.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory to scan for projects (defaults to the current directory)
    directory: Option<PathBuf>,

    /// Output directory relative to each project (defaults to `Locz`)
    output: Option<String>,

    /// Configuration file (defaults to `locz.toml` in the scanned directory, if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn print_summary(report: &RunReport) {
    for project in &report.projects {
        if let Some(e) = &project.error {
            error!("{}: {}", project.project.display(), e);
        }
        for table in &project.tables {
            if let Outcome::Failed { reason } = &table.outcome {
                warn!("{}: {}", table.table.display(), reason);
            }
        }
    }
    info!(
        "{} generated, {} up to date, {} failed",
        report.generated_count(),
        report.up_to_date_count(),
        report.failed_count()
    );
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let directory = match args.directory {
        Some(dir) => dir,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                error!("Cannot determine the current directory: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let output = args.output.as_deref();
    let (config, source) = match resolve_config(&directory, args.config.as_deref(), output) {
        Ok(resolved) => resolved,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Scanning directory: {}", directory.display());
    info!("Output subpath: {}", config.output_subpath);
    if let Some(source) = source {
        info!("Using configuration: {}", source.display());
    }

    let report = match Locz::with_config(config).run(&directory) {
        Ok(report) => report,
        Err(e) => {
            error!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Cannot serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    print_summary(&report);

    if report.has_failures() {
        ExitCode::FAILURE
    } else {
        info!("Localization generation completed successfully.");
        ExitCode::SUCCESS
    }
}
