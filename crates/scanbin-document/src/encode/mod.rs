// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encoder — packs a binary raster at one bit per pixel and writes it to disk
// in the format named by the destination's extension.

pub mod bmp;
pub mod pbm;
pub mod writer;

use std::path::Path;

use scanbin_core::error::ScanbinError;
use scanbin_core::types::BinaryRaster;
use serde::Serialize;
use tracing::{info, instrument};

pub use bmp::encode_bmp;
pub use pbm::encode_pbm;
pub use writer::write_atomic;

/// Supported 1-bit output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Bmp,
    Pbm,
}

impl OutputFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ScanbinError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("bmp") => Ok(OutputFormat::Bmp),
            Some("pbm") => Ok(OutputFormat::Pbm),
            Some(other) => Err(ScanbinError::UnsupportedFormat(format!(
                "'.{other}' (expected .bmp or .pbm)"
            ))),
            None => Err(ScanbinError::UnsupportedFormat(format!(
                "{} has no extension (expected .bmp or .pbm)",
                path.display()
            ))),
        }
    }

    pub fn encode(self, raster: &BinaryRaster) -> Result<Vec<u8>, ScanbinError> {
        match self {
            OutputFormat::Bmp => encode_bmp(raster),
            OutputFormat::Pbm => encode_pbm(raster),
        }
    }
}

/// Encode `raster` in the format implied by `path` and write it atomically.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn save(raster: &BinaryRaster, path: impl AsRef<Path>) -> Result<OutputFormat, ScanbinError> {
    let path = path.as_ref();
    let format = OutputFormat::from_path(path)?;
    let bytes = format.encode(raster)?;
    write_atomic(path, &bytes)?;
    info!(
        format = ?format,
        bytes = bytes.len(),
        width = raster.width(),
        height = raster.height(),
        "Bitmap written"
    );
    Ok(format)
}

/// Rebuild a binary raster from decoded luma: dark pixels (< 128) are
/// foreground.
#[cfg(test)]
pub(crate) fn raster_from_luma(gray: &image::GrayImage) -> BinaryRaster {
    use scanbin_core::types::Label;

    BinaryRaster::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y).0[0] < 128 {
            Label::Foreground
        } else {
            Label::Background
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanbin_core::types::Label;

    fn checkerboard(width: u32, height: u32) -> BinaryRaster {
        BinaryRaster::from_fn(width, height, |x, y| {
            if (x / 3 + y) % 2 == 0 { Label::Foreground } else { Label::Background }
        })
    }

    #[test]
    fn extension_selects_format() {
        assert_eq!(OutputFormat::from_path(Path::new("a/b.bmp")).unwrap(), OutputFormat::Bmp);
        assert_eq!(OutputFormat::from_path(Path::new("SCAN.BMP")).unwrap(), OutputFormat::Bmp);
        assert_eq!(OutputFormat::from_path(Path::new("x.pbm")).unwrap(), OutputFormat::Pbm);
    }

    #[test]
    fn unknown_or_missing_extension_is_unsupported() {
        for name in ["out.png", "out.gif", "out"] {
            match OutputFormat::from_path(Path::new(name)) {
                Err(err @ ScanbinError::UnsupportedFormat(_)) => assert_eq!(err.exit_code(), 5),
                other => panic!("{name}: expected unsupported format, got {other:?}"),
            }
        }
    }

    #[test]
    fn unsupported_extension_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.jpg");
        assert!(save(&checkerboard(4, 4), &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn bmp_round_trips_through_decoder() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("board.bmp");
        let raster = checkerboard(37, 11);

        assert_eq!(save(&raster, &path).expect("save"), OutputFormat::Bmp);

        let decoded = image::open(&path).expect("decode bmp").to_luma8();
        assert!(decoded.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert_eq!(raster_from_luma(&decoded), raster);
    }

    #[test]
    fn pbm_round_trips_through_decoder() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("board.pbm");
        let raster = checkerboard(13, 9);

        assert_eq!(save(&raster, &path).expect("save"), OutputFormat::Pbm);

        let decoded = image::open(&path).expect("decode pbm").to_luma8();
        assert_eq!(raster_from_luma(&decoded), raster);
    }

    #[test]
    fn empty_raster_is_not_written() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.bmp");
        assert!(matches!(
            save(&BinaryRaster::new(0, 0), &path),
            Err(ScanbinError::Encode(_))
        ));
        assert!(!path.exists());
    }
}
