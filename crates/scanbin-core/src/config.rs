// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Thresholding and border-removal parameters.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanbinError};

/// Parameters of the block-splitting adaptive threshold.
///
/// Fixed for the duration of a run. The defaults suit typical 300 DPI
/// document scans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdParams {
    /// Weight (0..=1) given to the enclosing block's estimates when smoothing a
    /// block's own estimates. Also scales the standard deviation above which a
    /// block is split further.
    pub sensitivity: f64,
    /// Edge of the coarse grid squares, in pixels.
    pub max_block_size: u32,
    /// Smallest edge a block may be split down to, in pixels.
    pub min_block_size: u32,
    /// Sampling stride used when gathering block statistics.
    pub downsample_factor: u32,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ThresholdParams {
    pub const DEFAULT: ThresholdParams = ThresholdParams {
        sensitivity: 0.2,
        max_block_size: 512,
        min_block_size: 64,
        downsample_factor: 2,
    };

    /// Reject parameter combinations the binarizer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.sensitivity.is_finite() || !(0.0..=1.0).contains(&self.sensitivity) {
            return Err(ScanbinError::Configuration(format!(
                "sensitivity must be within [0, 1], got {}",
                self.sensitivity
            )));
        }
        if self.max_block_size == 0 {
            return Err(ScanbinError::Configuration(
                "max_block_size must be positive".into(),
            ));
        }
        if self.min_block_size == 0 {
            return Err(ScanbinError::Configuration(
                "min_block_size must be positive".into(),
            ));
        }
        if self.downsample_factor == 0 {
            return Err(ScanbinError::Configuration(
                "downsample_factor must be positive".into(),
            ));
        }
        if self.min_block_size > self.max_block_size {
            return Err(ScanbinError::Configuration(format!(
                "min_block_size {} exceeds max_block_size {}",
                self.min_block_size, self.max_block_size
            )));
        }
        Ok(())
    }
}

/// Weights of the optional border-removal pass run after thresholding.
///
/// A foreground pixel is cleared when `horizontal_weight` times the length of
/// the horizontal ink run through it, plus `vertical_weight` times the length
/// of the vertical run, exceeds `threshold` times the image height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderParams {
    pub horizontal_weight: f64,
    pub vertical_weight: f64,
    /// Fraction of the image height.
    pub threshold: f64,
}

impl Default for BorderParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BorderParams {
    pub const DEFAULT: BorderParams = BorderParams {
        horizontal_weight: 0.3,
        vertical_weight: 1.0,
        threshold: 0.05,
    };

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("border horizontal weight", self.horizontal_weight),
            ("border vertical weight", self.vertical_weight),
            ("border threshold", self.threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScanbinError::Configuration(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}
