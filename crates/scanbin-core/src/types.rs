// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: pixel labels, the packed binary raster, and block
// rectangles.

/// The two levels a binarized pixel can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// Paper. Written as white.
    Background,
    /// Ink. Written as black.
    Foreground,
}

impl Label {
    pub fn is_foreground(self) -> bool {
        matches!(self, Label::Foreground)
    }
}

/// Bit-packed two-level raster, one bit per pixel in row-major order.
///
/// A set bit is `Label::Foreground`. Every pixel always holds exactly one
/// label; a freshly created raster is all background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryRaster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl BinaryRaster {
    /// Create an all-background raster.
    pub fn new(width: u32, height: u32) -> Self {
        let bits = width as usize * height as usize;
        Self {
            width,
            height,
            data: vec![0; bits.div_ceil(8)],
        }
    }

    /// Build a raster by asking `f` for the label of every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Label) -> Self {
        let mut raster = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                raster.set(x, y, f(x, y));
            }
        }
        raster
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when the raster has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn bit_position(&self, x: u32, y: u32) -> (usize, u8) {
        let index = y as usize * self.width as usize + x as usize;
        (index / 8, (index % 8) as u8)
    }

    /// Label at (x, y).
    ///
    /// # Panics
    ///
    /// Panics when (x, y) lies outside the raster.
    pub fn get(&self, x: u32, y: u32) -> Label {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} raster",
            self.width,
            self.height
        );
        let (byte, bit) = self.bit_position(x, y);
        if (self.data[byte] >> bit) & 1 == 1 {
            Label::Foreground
        } else {
            Label::Background
        }
    }

    /// Set the label at (x, y). Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, label: Label) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (byte, bit) = self.bit_position(x, y);
        match label {
            Label::Foreground => self.data[byte] |= 1 << bit,
            Label::Background => self.data[byte] &= !(1 << bit),
        }
    }

    /// Number of foreground pixels.
    pub fn foreground_count(&self) -> u64 {
        self.data.iter().map(|b| u64::from(b.count_ones())).sum()
    }

    /// Iterate one row of labels from left to right.
    pub fn row(&self, y: u32) -> impl Iterator<Item = Label> + '_ {
        (0..self.width).map(move |x| self.get(x, y))
    }
}

/// A rectangular region of the image produced by the block tree.
///
/// `size` is the nominal square edge at this level; `width` and `height` are
/// that square clipped to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub size: u32,
    pub depth: u32,
}

impl BlockRect {
    /// Square of edge `size` at (x, y), clipped to `image_width` x `image_height`.
    /// Returns `None` when nothing of it lies inside the image.
    pub fn clipped(
        x: u32,
        y: u32,
        size: u32,
        depth: u32,
        image_width: u32,
        image_height: u32,
    ) -> Option<Self> {
        if x >= image_width || y >= image_height || size == 0 {
            return None;
        }
        Some(Self {
            x,
            y,
            width: size.min(image_width - x),
            height: size.min(image_height - y),
            size,
            depth,
        })
    }

    /// Split into up to four quadrants of nominal edge `ceil(size / 2)`.
    ///
    /// Quadrants are clipped to this block, so the far ones may be narrower
    /// and ones falling entirely outside are omitted. The quadrants partition
    /// the block exactly.
    pub fn quadrants(&self) -> Vec<BlockRect> {
        let half = self.size.div_ceil(2);
        let mut out = Vec::with_capacity(4);
        for (dx, dy) in [(0, 0), (half, 0), (0, half), (half, half)] {
            if dx >= self.width || dy >= self.height {
                continue;
            }
            out.push(BlockRect {
                x: self.x + dx,
                y: self.y + dy,
                width: half.min(self.width - dx),
                height: half.min(self.height - dy),
                size: half,
                depth: self.depth + 1,
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_raster_is_all_background() {
        let raster = BinaryRaster::new(13, 5);
        assert_eq!(raster.foreground_count(), 0);
        assert!(raster.row(4).all(|l| l == Label::Background));
    }

    #[test]
    fn set_and_get_round_trip_across_byte_boundaries() {
        let mut raster = BinaryRaster::new(9, 3);
        raster.set(8, 0, Label::Foreground);
        raster.set(0, 1, Label::Foreground);
        assert_eq!(raster.get(8, 0), Label::Foreground);
        assert_eq!(raster.get(0, 1), Label::Foreground);
        assert_eq!(raster.get(7, 0), Label::Background);
        assert_eq!(raster.foreground_count(), 2);

        raster.set(8, 0, Label::Background);
        assert_eq!(raster.get(8, 0), Label::Background);
        assert_eq!(raster.foreground_count(), 1);
    }

    #[test]
    fn out_of_bounds_set_is_ignored() {
        let mut raster = BinaryRaster::new(4, 4);
        raster.set(4, 0, Label::Foreground);
        raster.set(0, 100, Label::Foreground);
        assert_eq!(raster.foreground_count(), 0);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_bounds_get_panics() {
        BinaryRaster::new(2, 2).get(2, 0);
    }

    #[test]
    fn from_fn_visits_every_pixel() {
        let raster = BinaryRaster::from_fn(6, 4, |x, _| {
            if x < 3 { Label::Foreground } else { Label::Background }
        });
        assert_eq!(raster.foreground_count(), 12);
        assert_eq!(raster.get(2, 3), Label::Foreground);
        assert_eq!(raster.get(3, 3), Label::Background);
    }

    #[test]
    fn empty_raster_reports_empty() {
        assert!(BinaryRaster::new(0, 10).is_empty());
        assert!(!BinaryRaster::new(1, 1).is_empty());
    }

    #[test]
    fn block_is_clipped_to_image() {
        let block = BlockRect::clipped(96, 0, 64, 0, 100, 50).expect("inside");
        assert_eq!((block.width, block.height), (4, 50));
        assert!(BlockRect::clipped(100, 0, 64, 0, 100, 50).is_none());
    }

    #[test]
    fn quadrants_partition_odd_block() {
        let block = BlockRect::clipped(5, 0, 5, 0, 20, 20).expect("inside");
        let quads = block.quadrants();
        assert_eq!(quads.len(), 4);
        let area = |r: &BlockRect| r.width * r.height;
        assert_eq!(quads.iter().map(area).sum::<u32>(), area(&block));
        assert!(quads.iter().all(|q| q.size == 3 && q.depth == 1));
        // Far quadrants stop at the parent edge instead of spilling into the
        // neighbouring block.
        assert!(quads.iter().all(|q| q.x + q.width <= 10 && q.y + q.height <= 5));
    }

    #[test]
    fn quadrants_skip_area_outside_clipped_block() {
        // 64-square clipped to a 20x40 sliver: only the left column of
        // quadrants survives.
        let block = BlockRect::clipped(0, 0, 64, 0, 20, 40).expect("inside");
        let quads = block.quadrants();
        assert_eq!(quads.len(), 2);
        assert_eq!((quads[0].width, quads[0].height), (20, 32));
        assert_eq!((quads[1].y, quads[1].height), (32, 8));
    }
}
