// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Binary PBM (P4) encoding through the `image` crate's PNM encoder.

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageEncoder};
use scanbin_core::error::ScanbinError;
use scanbin_core::types::{BinaryRaster, Label};

/// PBM bitmap samples: zero is written as a black bit.
const INK: u8 = 0;
const PAPER: u8 = 1;

/// Encode `raster` as a raw PBM. Foreground pixels are black.
pub fn encode_pbm(raster: &BinaryRaster) -> Result<Vec<u8>, ScanbinError> {
    if raster.is_empty() {
        return Err(ScanbinError::Encode(
            "cannot encode an empty raster as PBM".into(),
        ));
    }

    let samples: Vec<u8> = (0..raster.height())
        .flat_map(|y| raster.row(y))
        .map(|label| match label {
            Label::Foreground => INK,
            Label::Background => PAPER,
        })
        .collect();

    let mut out = Vec::new();
    PnmEncoder::new(&mut out)
        .with_subtype(PnmSubtype::Bitmap(SampleEncoding::Binary))
        .write_image(&samples, raster.width(), raster.height(), ExtendedColorType::L8)
        .map_err(|err| ScanbinError::Encode(format!("PBM encoding failed: {err}")))?;
    Ok(out)
}
