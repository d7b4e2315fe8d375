// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command line.
//
// Every technical error is mapped to a plain English summary with a concrete
// suggestion of what to try next.

use crate::error::ScanbinError;

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
}

/// Convert a `ScanbinError` into a `HumanError`.
pub fn humanize_error(err: &ScanbinError) -> HumanError {
    match err {
        ScanbinError::MissingInput(path) => HumanError {
            message: "The input file doesn't exist.".into(),
            suggestion: format!("Check the input path for typos: {}", path.display()),
        },

        ScanbinError::Decode(_) => HumanError {
            message: "The input file couldn't be read as an image.".into(),
            suggestion: "Make sure it is a PNG, JPEG, TIFF, BMP or similar raster image.".into(),
        },

        ScanbinError::Configuration(detail) => HumanError {
            message: "The settings don't make sense together.".into(),
            suggestion: format!(
                "Keep block sizes positive with --min-block-size no larger than --max-block-size, --sensitivity between 0 and 1, and border weights non-negative. ({detail})"
            ),
        },

        ScanbinError::UnsupportedFormat(_) => HumanError {
            message: "That output format isn't supported.".into(),
            suggestion: "Name the output file with a .bmp or .pbm extension.".into(),
        },

        ScanbinError::Encode(_) => HumanError {
            message: "The output file couldn't be written.".into(),
            suggestion: "Check that the destination directory exists and is writable.".into(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_input_is_reported_as_missing() {
        let err = ScanbinError::MissingInput(PathBuf::from("scan.png"));
        let human = humanize_error(&err);
        assert!(human.message.contains("doesn't exist"));
        assert!(human.suggestion.contains("scan.png"));
    }

    #[test]
    fn undecodable_input_under_misleading_path_is_not_missing() {
        let err = ScanbinError::Decode("/scans/not found/page.png: invalid signature".into());
        let human = humanize_error(&err);
        assert!(human.message.contains("couldn't be read"));
    }

    #[test]
    fn configuration_suggestion_carries_detail() {
        let err = ScanbinError::Configuration("min_block_size 64 exceeds max_block_size 32".into());
        let human = humanize_error(&err);
        assert!(human.suggestion.contains("min_block_size 64"));
    }

    #[test]
    fn unsupported_extension_points_at_bmp() {
        let err = ScanbinError::UnsupportedFormat("'gif'".into());
        let human = humanize_error(&err);
        assert!(human.suggestion.contains(".bmp"));
    }

    #[test]
    fn unwritable_destination_points_at_directory() {
        let err = ScanbinError::Encode("cannot create temporary file: permission denied".into());
        let human = humanize_error(&err);
        assert!(human.suggestion.contains("directory"));
    }

    #[test]
    fn directory_named_unsupported_is_still_a_write_failure() {
        let err = ScanbinError::Encode(
            "cannot create temporary file in /data/unsupported: No such file or directory".into(),
        );
        let human = humanize_error(&err);
        assert_eq!(human.message, "The output file couldn't be written.");
    }
}
