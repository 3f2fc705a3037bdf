// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan — flatten photographed documents from the command line.
//
// Entry point. Parses arguments, initialises logging, loads the scan
// configuration, and scans every input file.

mod batch;

use std::path::PathBuf;

use clap::Parser;
use docscan_core::ScanConfig;
use docscan_document::DocumentScanner;

use batch::{BatchOptions, run_batch};

#[derive(Parser)]
#[command(name = "docscan")]
#[command(about = "Detect a document in a photo and flatten it to a top-down scan")]
struct Cli {
    /// Photos to scan
    #[arg(value_name = "IMAGE", required = true)]
    images: Vec<PathBuf>,

    /// Directory for the scanned pages (written as <name>_scan.png)
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Produce grayscale output
    #[arg(long)]
    bw: bool,

    /// JSON file with scan parameters
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the working height used for detection
    #[arg(long, value_name = "PIXELS")]
    working_height: Option<u32>,

    /// Number of images scanned in parallel (default: one per CPU)
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    tracing::info!(images = args.images.len(), "docscan starting");

    let mut config = match &args.config {
        Some(path) => ScanConfig::from_json_file(path)?,
        None => ScanConfig::default(),
    };
    if let Some(height) = args.working_height {
        config.working_height = height;
    }
    let scanner = DocumentScanner::new(config)?;

    std::fs::create_dir_all(&args.output_dir)?;

    let options = BatchOptions {
        output_dir: args.output_dir,
        black_and_white: args.bw,
        jobs: args.jobs.unwrap_or(0),
    };

    let summary = run_batch(&scanner, &args.images, &options)?;
    tracing::info!(
        scanned = summary.scanned.len(),
        failed = summary.failed.len(),
        "docscan finished"
    );

    if !summary.failed.is_empty() {
        anyhow::bail!(
            "{} of {} images could not be scanned",
            summary.failed.len(),
            args.images.len()
        );
    }
    Ok(())
}
