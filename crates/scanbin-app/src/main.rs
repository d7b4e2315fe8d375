// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanbin — binarize a scanned page into a 1-bit bitmap.
//
// Entry point. Parses arguments, initialises logging, runs the pipeline, and
// maps failures to a diagnostic and a non-zero exit status.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use scanbin_core::{BorderParams, ThresholdParams};
use scanbin_core::error::ScanbinError;
use scanbin_core::human_errors::humanize_error;
use scanbin_document::RunSummary;

const DEFAULTS: ThresholdParams = ThresholdParams::DEFAULT;
const BORDER_DEFAULTS: BorderParams = BorderParams::DEFAULT;

#[derive(Debug, Parser)]
#[command(name = "scanbin", version, about = "Binarize a scanned page into a 1-bit bitmap")]
struct Cli {
    /// Image to binarize (PNG, JPEG, TIFF, BMP, ...).
    input: PathBuf,

    /// Destination bitmap; the extension selects the format (.bmp or .pbm).
    output: PathBuf,

    /// Weight of the enclosing block's estimate when smoothing a block (0..=1).
    #[arg(long, default_value_t = DEFAULTS.sensitivity)]
    sensitivity: f64,

    /// Edge of the coarse block grid, in pixels.
    #[arg(long, default_value_t = DEFAULTS.max_block_size)]
    max_block_size: u32,

    /// Smallest block edge the recursion may split down to, in pixels.
    #[arg(long, default_value_t = DEFAULTS.min_block_size)]
    min_block_size: u32,

    /// Sampling stride used when gathering block statistics.
    #[arg(long, default_value_t = DEFAULTS.downsample_factor)]
    downsample_factor: u32,

    /// Clear long straight ink runs (scanner frame, page edges) after
    /// thresholding.
    #[arg(long)]
    remove_border: bool,

    /// Weight of the horizontal run length in the border score.
    #[arg(long, default_value_t = BORDER_DEFAULTS.horizontal_weight, requires = "remove_border")]
    border_horizontal_weight: f64,

    /// Weight of the vertical run length in the border score.
    #[arg(long, default_value_t = BORDER_DEFAULTS.vertical_weight, requires = "remove_border")]
    border_vertical_weight: f64,

    /// Border score limit, as a fraction of the image height.
    #[arg(long, default_value_t = BORDER_DEFAULTS.threshold, requires = "remove_border")]
    border_threshold: f64,

    /// Print a JSON summary of the run on stdout.
    #[arg(long)]
    report: bool,
}

impl Cli {
    fn params(&self) -> ThresholdParams {
        ThresholdParams {
            sensitivity: self.sensitivity,
            max_block_size: self.max_block_size,
            min_block_size: self.min_block_size,
            downsample_factor: self.downsample_factor,
        }
    }

    fn border(&self) -> Option<BorderParams> {
        self.remove_border.then(|| BorderParams {
            horizontal_weight: self.border_horizontal_weight,
            vertical_weight: self.border_vertical_weight,
            threshold: self.border_threshold,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match scanbin_document::run(&cli.input, &cli.output, cli.params(), cli.border()) {
        Ok(summary) => {
            if cli.report {
                print_report(&summary);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_failure(&err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn print_report(summary: &RunSummary) {
    match serde_json::to_string_pretty(summary) {
        Ok(json) => println!("{json}"),
        // The bitmap is already written; a broken report is not a failed run.
        Err(err) => tracing::warn!(error = %err, "could not serialise run report"),
    }
}

fn report_failure(err: &ScanbinError) {
    tracing::error!(error = %err, "scanbin failed");
    let human = humanize_error(err);
    eprintln!("error: {err}");
    eprintln!("  {}", human.message);
    eprintln!("  hint: {}", human.suggestion);
}
