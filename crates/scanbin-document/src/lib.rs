// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanbin-document — Loading, binarization, and 1-bit encoding of scanned
// document images.
//
// The pipeline is strictly sequential: load (`image`), threshold and
// optionally strip the scan border (`scan`), then encode and write
// (`encode`). `pipeline::run` chains them.

pub mod encode;
pub mod image;
pub mod pipeline;
pub mod scan;

// Re-export the primary entry points so callers can use `scanbin_document::Binarizer` etc.
pub use encode::{OutputFormat, save};
pub use crate::image::loader::ScanImage;
pub use pipeline::{RunSummary, run};
pub use scan::binarize::{Binarization, Binarizer, BlockPlan, Estimate, LeafBlock};
pub use scan::border::remove_border;
