// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — adaptive block-splitting binarization and optional
// border removal.

pub mod binarize;
pub mod border;

pub use binarize::{Binarization, Binarizer};
pub use border::remove_border;
