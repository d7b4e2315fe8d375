// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for scanbin.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for every stage of the pipeline.
///
/// None of these are recoverable within a run; each propagates to the process
/// boundary and ends it.
#[derive(Debug, Error)]
pub enum ScanbinError {
    /// The input path does not exist.
    #[error("failed to decode input: {} not found", .0.display())]
    MissingInput(PathBuf),

    /// The input could not be read or is not a recognised image format.
    #[error("failed to decode input: {0}")]
    Decode(String),

    /// Parameters were rejected before any pixel was processed.
    #[error("invalid parameters: {0}")]
    Configuration(String),

    /// The output path names a format scanbin cannot write.
    #[error("failed to encode output: unsupported format {0}")]
    UnsupportedFormat(String),

    /// The output could not be encoded or written.
    #[error("failed to encode output: {0}")]
    Encode(String),
}

impl ScanbinError {
    /// Process exit status reported for this error. Status 2 is left to the
    /// argument parser for usage errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            ScanbinError::MissingInput(_) | ScanbinError::Decode(_) => 3,
            ScanbinError::Configuration(_) => 4,
            ScanbinError::UnsupportedFormat(_) | ScanbinError::Encode(_) => 5,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanbinError>;
