// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Load → threshold → (border removal) → encode, as one sequential call chain.

use std::path::{Path, PathBuf};

use scanbin_core::config::{BorderParams, ThresholdParams};
use scanbin_core::error::ScanbinError;
use serde::Serialize;
use tracing::{info, instrument};

use crate::encode::{OutputFormat, save};
use crate::image::loader::ScanImage;
use crate::scan::binarize::{Binarization, Binarizer};
use crate::scan::border::remove_border;

/// What a completed run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub params: ThresholdParams,
    /// Present when border removal ran.
    pub border: Option<BorderParams>,
    pub border_pixels_removed: u64,
    /// Midpoint of the whole-image ink and paper estimates.
    pub global_threshold: f64,
    pub leaf_blocks: usize,
    pub max_depth: u32,
    pub foreground_pixels: u64,
    pub foreground_ratio: f64,
}

/// Binarize `input` and write the 1-bit result to `output`, clearing the scan
/// border first when `border` is given.
///
/// Parameters are validated before the input is read, so a configuration
/// error never touches the filesystem.
#[instrument(skip_all, fields(input = %input.as_ref().display(), output = %output.as_ref().display()))]
pub fn run(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    params: ThresholdParams,
    border: Option<BorderParams>,
) -> Result<RunSummary, ScanbinError> {
    let (input, output) = (input.as_ref(), output.as_ref());

    let binarizer = Binarizer::new(params)?;
    if let Some(border) = &border {
        border.validate()?;
    }
    let scan = ScanImage::open(input)?;

    let Binarization { plan, mut raster } = binarizer.binarize_image(&scan);
    let border_pixels_removed = match &border {
        Some(border) => remove_border(&mut raster, border),
        None => 0,
    };
    let format = save(&raster, output)?;

    let (width, height) = (scan.width(), scan.height());
    let total = u64::from(width) * u64::from(height);
    let foreground_pixels = raster.foreground_count();
    let summary = RunSummary {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        format,
        width,
        height,
        params,
        border,
        border_pixels_removed,
        global_threshold: plan.global().threshold(),
        leaf_blocks: plan.leaves().len(),
        max_depth: plan.max_depth(),
        foreground_pixels,
        foreground_ratio: foreground_pixels as f64 / total as f64,
    };
    info!(
        leaf_blocks = summary.leaf_blocks,
        foreground_ratio = summary.foreground_ratio,
        "Run complete"
    );
    Ok(summary)
}
