// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// 1-bit palettised BMP encoding.

use scanbin_core::error::ScanbinError;
use scanbin_core::types::{BinaryRaster, Label};

const FILE_HEADER_LEN: u32 = 14;
const INFO_HEADER_LEN: u32 = 40;
const PALETTE_LEN: u32 = 8;
const PIXEL_OFFSET: u32 = FILE_HEADER_LEN + INFO_HEADER_LEN + PALETTE_LEN;

/// 2835 pixels per metre, i.e. 72 DPI.
const PIXELS_PER_METRE: u32 = 2835;

/// Bytes per stored row: one bit per pixel, padded to a 4-byte boundary.
fn row_stride(width: u32) -> u32 {
    width.div_ceil(32) * 4
}

/// Encode `raster` as a 1-bit BMP.
///
/// Palette index 0 is black (foreground) and index 1 is white (background).
/// Rows are stored bottom-up with the leftmost pixel in the most significant
/// bit, as the format requires.
pub fn encode_bmp(raster: &BinaryRaster) -> Result<Vec<u8>, ScanbinError> {
    if raster.is_empty() {
        return Err(ScanbinError::Encode(
            "cannot encode an empty raster as BMP".into(),
        ));
    }

    let width = raster.width();
    let height = raster.height();
    let stride = row_stride(width);
    let image_size = u64::from(stride) * u64::from(height);
    let file_size = u64::from(PIXEL_OFFSET) + image_size;
    let (Ok(image_size), Ok(file_size), Ok(signed_width), Ok(signed_height)) = (
        u32::try_from(image_size),
        u32::try_from(file_size),
        i32::try_from(width),
        i32::try_from(height),
    ) else {
        return Err(ScanbinError::Encode(format!(
            "{width}x{height} raster is too large for BMP"
        )));
    };

    let mut out = Vec::with_capacity(file_size as usize);

    // BITMAPFILEHEADER
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&file_size.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&PIXEL_OFFSET.to_le_bytes());

    // BITMAPINFOHEADER
    out.extend_from_slice(&INFO_HEADER_LEN.to_le_bytes());
    out.extend_from_slice(&signed_width.to_le_bytes());
    out.extend_from_slice(&signed_height.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&1u16.to_le_bytes()); // bits per pixel
    out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    out.extend_from_slice(&image_size.to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
    out.extend_from_slice(&2u32.to_le_bytes()); // colours used
    out.extend_from_slice(&2u32.to_le_bytes()); // colours important

    // Palette entries are B, G, R, reserved.
    out.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    out.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0x00]);

    let mut row = vec![0u8; stride as usize];
    for y in (0..height).rev() {
        row.fill(0);
        for (x, label) in raster.row(y).enumerate() {
            if label == Label::Background {
                row[x / 8] |= 0x80 >> (x % 8);
            }
        }
        out.extend_from_slice(&row);
    }

    debug_assert_eq!(out.len(), file_size as usize);
    Ok(out)
}
