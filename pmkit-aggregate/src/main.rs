//! pmkit-aggregate - Command-line entry point
//!
//! Merges the given model documents into one ensemble document. Nothing is
//! written unless the whole run succeeds.

use anyhow::{Context, Result};
use clap::Parser;
use pmkit_aggregate::{aggregate, AggregateError, AggregationReport};
use pmkit_common::config::TomlConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "pmkit-aggregate")]
#[command(about = "Combine PMML model documents into one ensemble model", version)]
struct Args {
    /// Input documents, in ensemble member order
    #[arg(long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Per-member weights, one per input; enables weighted averaging
    #[arg(long, num_args = 1.., allow_negative_numbers = true)]
    weights: Option<Vec<f64>>,

    /// Destination document (replaced if it exists)
    #[arg(long)]
    output: PathBuf,

    /// Configuration file (overrides PMKIT_CONFIG and the per-user file)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON run summary here
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let (config, source) = match TomlConfig::resolve(args.config.as_deref()) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Error: configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting pmkit-aggregate v{} (config: {})",
        env!("CARGO_PKG_VERSION"),
        source
    );

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let kind = e
                .downcast_ref::<AggregateError>()
                .map_or("Error", AggregateError::kind);
            error!(kind, "{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, config: &TomlConfig) -> Result<()> {
    let weights = args.weights.as_deref();
    let document = aggregate(&args.input, weights)?;

    // Report is staged first so a bad report path fails before the output exists
    let report = match &args.report {
        Some(path) => Some(
            AggregationReport::from_document(&args.input, &document)
                .stage(path)
                .with_context(|| format!("Failed to write report {}", path.display()))?,
        ),
        None => None,
    };

    if let Err(e) = pmkit_common::save(&document, &args.output, &config.output.save_options()) {
        if let Some(report) = report {
            report.discard();
        }
        return Err(e).with_context(|| format!("Failed to write {}", args.output.display()));
    }
    info!(path = %args.output.display(), "Wrote ensemble document");

    if let Some(report) = report {
        report.commit().context("Failed to publish report")?;
    }

    Ok(())
}
