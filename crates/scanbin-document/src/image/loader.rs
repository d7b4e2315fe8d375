// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Loader — decodes an input file into an in-memory raster and converts it to
// 8-bit luma for the binarizer.

use std::io::ErrorKind;
use std::path::Path;

use image::{DynamicImage, GrayImage, ImageError, ImageReader, Rgb, RgbImage, Rgba};
use scanbin_core::error::ScanbinError;
use tracing::{debug, info, instrument};

/// A decoded input raster (greyscale or colour, with or without alpha).
pub struct ScanImage {
    image: DynamicImage,
}

impl ScanImage {
    // -- Construction ---------------------------------------------------------

    /// Decode an image file.
    ///
    /// The format is sniffed from the file's leading bytes, falling back to
    /// the extension when the signature is not recognised.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScanbinError> {
        let path = path.as_ref();
        let reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|err| decode_io_error(path, err))?;
        let format = reader.format();
        let image = reader.decode().map_err(|err| match err {
            ImageError::IoError(io) => decode_io_error(path, io),
            other => ScanbinError::Decode(format!("{}: {}", path.display(), other)),
        })?;
        info!(
            width = image.width(),
            height = image.height(),
            format = ?format,
            "Image loaded"
        );
        Ok(Self { image })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    // -- Conversion -----------------------------------------------------------

    /// Convert to 8-bit luma.
    ///
    /// Images with an alpha channel are composited onto white first, so
    /// transparent areas read as blank paper rather than as ink.
    pub fn to_luma(&self) -> GrayImage {
        if !self.image.color().has_alpha() {
            return self.image.to_luma8();
        }

        debug!("Flattening alpha onto white");
        let rgba = self.image.to_rgba8();
        let flattened = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
            let over_white = |channel: u8| -> u8 {
                let alpha = u16::from(a);
                ((u16::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255) as u8
            };
            Rgb([over_white(r), over_white(g), over_white(b)])
        });
        DynamicImage::ImageRgb8(flattened).to_luma8()
    }
}

fn decode_io_error(path: &Path, err: std::io::Error) -> ScanbinError {
    if err.kind() == ErrorKind::NotFound {
        ScanbinError::MissingInput(path.to_path_buf())
    } else {
        ScanbinError::Decode(format!("{}: {}", path.display(), err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, LumaA};
    use image::{GrayImage, Luma, RgbaImage};

    #[test]
    fn open_missing_file_reports_the_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.png");
        match ScanImage::open(&path) {
            Err(ScanbinError::MissingInput(missing)) => assert_eq!(missing, path),
            other => panic!("expected missing input, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn open_garbage_is_decode_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.png");
        std::fs::write(&path, b"this is plainly not a PNG").expect("write");
        assert!(matches!(ScanImage::open(&path), Err(ScanbinError::Decode(_))));
    }

    #[test]
    fn open_detects_format_from_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        // PNG bytes behind a misleading extension.
        let path = dir.path().join("page.dat");
        GrayImage::from_pixel(7, 5, Luma([90u8]))
            .save_with_format(&path, image::ImageFormat::Png)
            .expect("save png");

        let scan = ScanImage::open(&path).expect("open");
        assert_eq!((scan.width(), scan.height()), (7, 5));
        assert_eq!(scan.to_luma().get_pixel(3, 3).0[0], 90);
    }

    #[test]
    fn transparent_pixels_flatten_to_white() {
        let mut rgba = RgbaImage::from_pixel(2, 1, image::Rgba([0, 0, 0, 0]));
        rgba.put_pixel(1, 0, image::Rgba([0, 0, 0, 255]));
        let luma = ScanImage::from_dynamic(DynamicImage::ImageRgba8(rgba)).to_luma();
        assert_eq!(luma.get_pixel(0, 0).0[0], 255);
        assert_eq!(luma.get_pixel(1, 0).0[0], 0);
    }

    #[test]
    fn half_transparent_grey_lightens() {
        let img = GrayAlphaImage::from_pixel(1, 1, LumaA([0u8, 128]));
        let luma = ScanImage::from_dynamic(DynamicImage::ImageLumaA8(img)).to_luma();
        let value = luma.get_pixel(0, 0).0[0];
        assert!((120..=135).contains(&value), "got {value}");
    }

    #[test]
    fn greyscale_passes_through_unchanged() {
        let img = GrayImage::from_fn(4, 4, |x, y| Luma([(x * 40 + y) as u8]));
        let luma = ScanImage::from_dynamic(DynamicImage::ImageLuma8(img.clone())).to_luma();
        assert_eq!(luma, img);
    }
}
