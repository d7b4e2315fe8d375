// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Adaptive block-splitting binarization for scanned documents.
//
// The image is tiled into coarse squares which are split recursively into
// quadrants wherever their content is busy. Every block estimates an ink
// (foreground) and a paper (background) intensity from its own pixels,
// smoothed towards the estimate of the block that contains it, and pixels of
// the smallest (leaf) blocks are classified against the midpoint of the two.

use image::GrayImage;
use scanbin_core::config::ThresholdParams;
use scanbin_core::error::ScanbinError;
use scanbin_core::types::{BinaryRaster, BlockRect, Label};
use tracing::{debug, info, instrument};

use crate::image::loader::ScanImage;

/// Ink/paper centres used when nothing is known about the image yet. Their
/// midpoint is the global fallback threshold.
const DEFAULT_FOREGROUND: f64 = 0.0;
const DEFAULT_BACKGROUND: f64 = 255.0;

/// Blocks whose two clusters are closer than this are treated as flat and
/// inherit the enclosing estimate.
const MIN_CONTRAST: f64 = 24.0;

/// Standard deviation bound for splitting is `sensitivity * SPLIT_SCALE`.
const SPLIT_SCALE: f64 = 64.0;

const MAX_ITERATIONS: usize = 16;
const CONVERGENCE: f64 = 0.5;

/// Foreground (ink) and background (paper) intensity centres of a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub foreground: f64,
    pub background: f64,
}

impl Estimate {
    /// Estimate used as the parent of the whole image.
    pub const DEFAULT: Estimate = Estimate {
        foreground: DEFAULT_FOREGROUND,
        background: DEFAULT_BACKGROUND,
    };

    /// Pixels strictly below this value are foreground.
    pub fn threshold(&self) -> f64 {
        (self.foreground + self.background) / 2.0
    }

    pub fn contrast(&self) -> f64 {
        self.background - self.foreground
    }

    fn blend(&self, parent: &Estimate, parent_weight: f64) -> Estimate {
        let mix = |local: f64, inherited: f64| {
            (1.0 - parent_weight) * local + parent_weight * inherited
        };
        Estimate {
            foreground: mix(self.foreground, parent.foreground),
            background: mix(self.background, parent.background),
        }
    }
}

/// A block that was not split further, with the estimate its pixels are
/// classified against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafBlock {
    pub rect: BlockRect,
    pub estimate: Estimate,
}

impl LeafBlock {
    pub fn threshold(&self) -> f64 {
        self.estimate.threshold()
    }
}

/// The leaves of the block tree for one image, in traversal order.
///
/// Leaves never overlap and together cover every pixel exactly once.
#[derive(Debug, Clone)]
pub struct BlockPlan {
    width: u32,
    height: u32,
    global: Estimate,
    leaves: Vec<LeafBlock>,
}

impl BlockPlan {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whole-image estimate every coarse tile starts from.
    pub fn global(&self) -> Estimate {
        self.global
    }

    pub fn leaves(&self) -> &[LeafBlock] {
        &self.leaves
    }

    /// Deepest split level reached (0 when no tile was split).
    pub fn max_depth(&self) -> u32 {
        self.leaves.iter().map(|leaf| leaf.rect.depth).max().unwrap_or(0)
    }
}

/// Output of `Binarizer::binarize_image`.
#[derive(Debug, Clone)]
pub struct Binarization {
    pub plan: BlockPlan,
    pub raster: BinaryRaster,
}

/// Sample statistics of one block.
struct BlockStats {
    std_dev: f64,
    estimate: Estimate,
}

/// Adaptive binarizer configured with validated `ThresholdParams`.
#[derive(Debug, Clone)]
pub struct Binarizer {
    params: ThresholdParams,
}

impl Binarizer {
    /// Validate `params` and build a binarizer.
    ///
    /// Fails with `ScanbinError::Configuration` before any pixel is touched.
    pub fn new(params: ThresholdParams) -> Result<Self, ScanbinError> {
        params.validate()?;
        debug!(?params, "Binarizer configured");
        Ok(Self { params })
    }

    /// Binarize a decoded image (converted to luma first), keeping the block
    /// tree alongside the classified pixels.
    pub fn binarize_image(&self, image: &ScanImage) -> Binarization {
        let gray = image.to_luma();
        let plan = self.plan(&gray);
        let raster = self.apply(&plan, &gray);
        Binarization { plan, raster }
    }

    /// Plan the block tree for `gray` and classify every pixel.
    #[instrument(skip_all, fields(width = gray.width(), height = gray.height()))]
    pub fn binarize(&self, gray: &GrayImage) -> BinaryRaster {
        let plan = self.plan(gray);
        self.apply(&plan, gray)
    }

    /// Build the block tree for `gray`.
    #[instrument(skip_all, fields(width = gray.width(), height = gray.height()))]
    pub fn plan(&self, gray: &GrayImage) -> BlockPlan {
        let (width, height) = gray.dimensions();
        let mut leaves = Vec::new();

        let whole = BlockRect {
            x: 0,
            y: 0,
            width,
            height,
            size: width.max(height),
            depth: 0,
        };
        let global = self.measure(gray, &whole, &Estimate::DEFAULT).estimate;
        debug!(
            foreground = global.foreground,
            background = global.background,
            threshold = global.threshold(),
            "Global estimate"
        );

        let tile = self.params.max_block_size;
        for y in (0..height).step_by(tile as usize) {
            for x in (0..width).step_by(tile as usize) {
                if let Some(rect) = BlockRect::clipped(x, y, tile, 0, width, height) {
                    self.descend(gray, rect, &global, &mut leaves);
                }
            }
        }

        let plan = BlockPlan {
            width,
            height,
            global,
            leaves,
        };
        info!(
            leaves = plan.leaves.len(),
            max_depth = plan.max_depth(),
            "Block plan computed"
        );
        plan
    }

    /// Classify every pixel of `gray` against the leaf that contains it.
    ///
    /// # Panics
    ///
    /// Panics when `plan` was computed for an image of different dimensions.
    pub fn apply(&self, plan: &BlockPlan, gray: &GrayImage) -> BinaryRaster {
        assert_eq!(
            (plan.width, plan.height),
            gray.dimensions(),
            "block plan does not match image dimensions"
        );

        let mut raster = BinaryRaster::new(plan.width, plan.height);
        for leaf in &plan.leaves {
            let threshold = leaf.threshold();
            let rect = leaf.rect;
            for y in rect.y..rect.y + rect.height {
                for x in rect.x..rect.x + rect.width {
                    let value = f64::from(gray.get_pixel(x, y).0[0]);
                    let label = if value < threshold {
                        Label::Foreground
                    } else {
                        Label::Background
                    };
                    raster.set(x, y, label);
                }
            }
        }

        debug!(foreground = raster.foreground_count(), "Classification complete");
        raster
    }

    // -- Block tree -----------------------------------------------------------

    fn descend(
        &self,
        gray: &GrayImage,
        rect: BlockRect,
        parent: &Estimate,
        leaves: &mut Vec<LeafBlock>,
    ) {
        let stats = self.measure(gray, &rect, parent);

        let half = rect.size.div_ceil(2);
        let can_split = rect.size > 1 && half >= self.params.min_block_size;
        let busy = stats.std_dev > self.params.sensitivity * SPLIT_SCALE;

        if can_split && busy {
            for quadrant in rect.quadrants() {
                self.descend(gray, quadrant, &stats.estimate, leaves);
            }
        } else {
            leaves.push(LeafBlock {
                rect,
                estimate: stats.estimate,
            });
        }
    }

    /// Gather sampled statistics for `rect` and derive its smoothed estimate.
    fn measure(&self, gray: &GrayImage, rect: &BlockRect, parent: &Estimate) -> BlockStats {
        let histogram = sample_histogram(gray, rect, self.params.downsample_factor);
        let total: u64 = histogram.iter().sum();
        if total == 0 {
            return BlockStats {
                std_dev: 0.0,
                estimate: *parent,
            };
        }

        let (mean, std_dev) = mean_and_std_dev(&histogram, total);

        let estimate = match two_means(&histogram) {
            Some(local) if local.contrast() >= MIN_CONTRAST => {
                local.blend(parent, self.params.sensitivity)
            }
            _ => *parent,
        };

        debug!(
            x = rect.x,
            y = rect.y,
            size = rect.size,
            depth = rect.depth,
            mean,
            std_dev,
            threshold = estimate.threshold(),
            "Block measured"
        );
        BlockStats { std_dev, estimate }
    }
}

// -- Statistics helpers -------------------------------------------------------

/// Histogram of the pixels of `rect` sampled every `stride` pixels in each
/// direction, starting at the block origin.
fn sample_histogram(gray: &GrayImage, rect: &BlockRect, stride: u32) -> [u64; 256] {
    let mut histogram = [0u64; 256];
    let stride = stride.max(1) as usize;
    for y in (rect.y..rect.y + rect.height).step_by(stride) {
        for x in (rect.x..rect.x + rect.width).step_by(stride) {
            histogram[gray.get_pixel(x, y).0[0] as usize] += 1;
        }
    }
    histogram
}

fn mean_and_std_dev(histogram: &[u64; 256], total: u64) -> (f64, f64) {
    let total = total as f64;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for (value, &count) in histogram.iter().enumerate() {
        let value = value as f64;
        let count = count as f64;
        sum += value * count;
        sum_sq += value * value * count;
    }
    let mean = sum / total;
    let variance = (sum_sq / total - mean * mean).max(0.0);
    (mean, variance.sqrt())
}

/// Split the sampled intensities into a dark and a light cluster.
///
/// Starts from the darkest and lightest sample and alternates assignment and
/// mean updates until the centres settle. Returns `None` when the samples
/// span less than `MIN_CONTRAST`, as there is nothing to separate.
fn two_means(histogram: &[u64; 256]) -> Option<Estimate> {
    let darkest = histogram.iter().position(|&c| c > 0)?;
    let lightest = histogram.iter().rposition(|&c| c > 0)?;
    if ((lightest - darkest) as f64) < MIN_CONTRAST {
        return None;
    }

    let mut dark = darkest as f64;
    let mut light = lightest as f64;
    for _ in 0..MAX_ITERATIONS {
        let cut = (dark + light) / 2.0;
        let (mut dark_sum, mut dark_count) = (0.0, 0u64);
        let (mut light_sum, mut light_count) = (0.0, 0u64);
        for (value, &count) in histogram.iter().enumerate() {
            if count == 0 {
                continue;
            }
            // Ties go to the light cluster.
            if (value as f64) < cut {
                dark_sum += value as f64 * count as f64;
                dark_count += count;
            } else {
                light_sum += value as f64 * count as f64;
                light_count += count;
            }
        }

        let next_dark = if dark_count > 0 { dark_sum / dark_count as f64 } else { dark };
        let next_light = if light_count > 0 { light_sum / light_count as f64 } else { light };
        let settled =
            (next_dark - dark).abs() < CONVERGENCE && (next_light - light).abs() < CONVERGENCE;
        dark = next_dark;
        light = next_light;
        if settled {
            break;
        }
    }

    Some(Estimate {
        foreground: dark,
        background: light,
    })
}

// -- Tests --------------------------------------------------------------------
