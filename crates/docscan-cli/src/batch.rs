// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch scanning — one independent pipeline run per input file, spread over
// a rayon thread pool.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use docscan_core::error::DocscanError;
use docscan_core::human_errors::{Severity, humanize_error};
use docscan_document::{DocumentScanner, ImageProcessor};
use rayon::prelude::*;
use tracing::{Level, error, info, instrument, warn};

/// Where and how scanned pages are written.
pub struct BatchOptions {
    pub output_dir: PathBuf,
    pub black_and_white: bool,
    /// Worker thread count; 0 lets rayon pick one per CPU.
    pub jobs: usize,
}

/// Per-file results of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// (input, written output) pairs.
    pub scanned: Vec<(PathBuf, PathBuf)>,
    /// (input, error) pairs.
    pub failed: Vec<(PathBuf, DocscanError)>,
}

fn stem_of(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string())
}

/// Output path for `input`: `<output_dir>/<stem>_scan.png`.
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}_scan.png", stem_of(input)))
}

/// One output path per input, unique within the batch.
///
/// Inputs sharing a stem (`a/card.png`, `b/card.jpg`) get numbered names after
/// the first: `card_scan.png`, `card_scan_2.png`, ...
pub fn assign_outputs(inputs: &[PathBuf], output_dir: &Path) -> Vec<PathBuf> {
    let mut taken = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let mut output = output_path(input, output_dir);
            let mut n = 2;
            while !taken.insert(output.clone()) {
                output = output_dir.join(format!("{}_scan_{n}.png", stem_of(input)));
                n += 1;
            }
            if n > 2 {
                warn!(
                    input = %input.display(),
                    output = %output.display(),
                    "Output name already used in this batch, numbering it"
                );
            }
            output
        })
        .collect()
}

/// Load, scan and save a single file.
#[instrument(skip_all, fields(input = %input.display()))]
pub fn scan_file(
    scanner: &DocumentScanner,
    input: &Path,
    output: &Path,
    black_and_white: bool,
) -> Result<(), DocscanError> {
    let photo = ImageProcessor::open(input)?.into_dynamic();
    let page = scanner.scan(&photo, black_and_white)?;

    ImageProcessor::from_dynamic(page).save(output)?;
    info!(output = %output.display(), "Scanned page written");
    Ok(())
}

/// Log level for a failed file: a bad photo is a warning, anything the user
/// has to fix elsewhere is an error.
fn failure_level(severity: Severity) -> Level {
    match severity {
        Severity::RetakePhoto => Level::WARN,
        Severity::ActionRequired | Severity::Permanent => Level::ERROR,
    }
}

fn log_failure(input: &Path, err: &DocscanError) {
    let human = humanize_error(err);
    if failure_level(human.severity) == Level::WARN {
        warn!(
            input = %input.display(),
            error = %err,
            "{} {}",
            human.message,
            human.suggestion
        );
    } else {
        error!(
            input = %input.display(),
            error = %err,
            "{} {}",
            human.message,
            human.suggestion
        );
    }
}

/// Scan every input, never stopping early on a failed file.
pub fn run_batch(
    scanner: &DocumentScanner,
    inputs: &[PathBuf],
    options: &BatchOptions,
) -> Result<BatchSummary, rayon::ThreadPoolBuildError> {
    let outputs = assign_outputs(inputs, &options.output_dir);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs)
        .build()?;

    let results: Vec<(PathBuf, PathBuf, Result<(), DocscanError>)> = pool.install(|| {
        inputs
            .par_iter()
            .zip(outputs.into_par_iter())
            .map(|(input, output)| {
                let result = scan_file(scanner, input, &output, options.black_and_white);
                if let Err(err) = &result {
                    log_failure(input, err);
                }
                (input.clone(), output, result)
            })
            .collect()
    });

    let mut summary = BatchSummary::default();
    for (input, output, result) in results {
        match result {
            Ok(()) => summary.scanned.push((input, output)),
            Err(err) => summary.failed.push((input, err)),
        }
    }
    Ok(summary)
}
