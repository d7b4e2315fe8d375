// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Border removal — clears the long straight ink runs a scanner lid or page
// edge leaves along the margins of a binarized scan.

use std::ops::Range;

use scanbin_core::config::BorderParams;
use scanbin_core::types::{BinaryRaster, Label};
use tracing::{info, instrument};

/// Clear foreground pixels that lie on long horizontal or vertical runs.
///
/// Each foreground pixel is scored by the weighted lengths of the horizontal
/// and vertical ink runs passing through it (see `BorderParams`). Runs are
/// measured on the raster as it was before any pixel is cleared. Returns the
/// number of pixels turned into background.
#[instrument(skip_all, fields(width = raster.width(), height = raster.height()))]
pub fn remove_border(raster: &mut BinaryRaster, params: &BorderParams) -> u64 {
    let width = raster.width() as usize;
    let height = raster.height() as usize;
    if width == 0 || height == 0 {
        return 0;
    }

    let mut score = vec![0.0f64; width * height];

    for y in 0..height {
        let runs = ink_runs(width, |x| raster.get(x as u32, y as u32).is_foreground());
        for run in runs {
            let weight = params.horizontal_weight * run.len() as f64;
            for x in run {
                score[y * width + x] += weight;
            }
        }
    }

    for x in 0..width {
        let runs = ink_runs(height, |y| raster.get(x as u32, y as u32).is_foreground());
        for run in runs {
            let weight = params.vertical_weight * run.len() as f64;
            for y in run {
                score[y * width + x] += weight;
            }
        }
    }

    let limit = params.threshold * height as f64;
    let before = raster.foreground_count();
    // Background pixels score zero and can never pass a non-negative limit.
    *raster = BinaryRaster::from_fn(raster.width(), raster.height(), |x, y| {
        if score[y as usize * width + x as usize] > limit {
            Label::Background
        } else {
            raster.get(x, y)
        }
    });
    let cleared = before - raster.foreground_count();

    info!(cleared, limit, "Border removed");
    cleared
}

/// Maximal ranges of consecutive positions in `0..len` for which `is_ink`
/// holds.
fn ink_runs(len: usize, is_ink: impl Fn(usize) -> bool) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = None;
    for i in 0..len {
        match (is_ink(i), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(s..len);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 400x300 page with a 4-pixel frame and one 8x10 glyph in the middle.
    fn framed_page() -> BinaryRaster {
        BinaryRaster::from_fn(400, 300, |x, y| {
            let frame = x < 4 || y < 4 || x >= 396 || y >= 296;
            let glyph = (200..208).contains(&x) && (150..160).contains(&y);
            if frame || glyph { Label::Foreground } else { Label::Background }
        })
    }

    #[test]
    fn frame_is_cleared_and_text_kept() {
        let mut page = framed_page();
        let cleared = remove_border(&mut page, &BorderParams::default());

        assert_eq!(cleared, 400 * 300 - 392 * 292);
        assert_eq!(page.foreground_count(), 8 * 10);
        assert_eq!(page.get(0, 0), Label::Background);
        assert_eq!(page.get(398, 150), Label::Background);
        assert_eq!(page.get(203, 155), Label::Foreground);
    }

    #[test]
    fn blank_page_is_untouched() {
        let mut page = BinaryRaster::new(50, 40);
        assert_eq!(remove_border(&mut page, &BorderParams::default()), 0);
        assert_eq!(page, BinaryRaster::new(50, 40));
    }

    #[test]
    fn weights_select_the_orientation_removed() {
        // One-pixel rule across the page.
        let rule = || BinaryRaster::from_fn(400, 300, |_, y| {
            if y == 100 { Label::Foreground } else { Label::Background }
        });

        let mut page = rule();
        let vertical_only = BorderParams { horizontal_weight: 0.0, ..Default::default() };
        assert_eq!(remove_border(&mut page, &vertical_only), 0);

        let mut page = rule();
        assert_eq!(remove_border(&mut page, &BorderParams::default()), 400);
        assert_eq!(page.foreground_count(), 0);
    }

    #[test]
    fn score_equal_to_limit_is_kept() {
        // Vertical stroke of 15 pixels; limit is 0.05 * 300 = 15.
        let mut page = BinaryRaster::from_fn(40, 300, |x, y| {
            if x == 20 && (10..25).contains(&y) { Label::Foreground } else { Label::Background }
        });
        let params = BorderParams { horizontal_weight: 0.0, ..Default::default() };
        assert_eq!(remove_border(&mut page, &params), 0);
        assert_eq!(page.foreground_count(), 15);
    }

    #[test]
    fn runs_cover_both_ends() {
        let ink = [true, true, false, true, false, false, true];
        assert_eq!(ink_runs(ink.len(), |i| ink[i]), vec![0..2, 3..4, 6..7]);
        assert!(ink_runs(0, |_| true).is_empty());
    }
}
