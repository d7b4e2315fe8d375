// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Atomic file output: write beside the destination, then rename over it.

use std::io::Write;
use std::path::Path;

use scanbin_core::error::ScanbinError;
use tracing::debug;

/// Write `bytes` to `path` so that `path` either holds the complete new
/// contents or is left untouched.
///
/// The data goes to a temporary file in the destination directory, is synced
/// to disk, and is then renamed into place. On any failure the temporary file
/// is removed.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ScanbinError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".scanbin-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|err| {
            ScanbinError::Encode(format!(
                "cannot create temporary file in {}: {}",
                dir.display(),
                err
            ))
        })?;
    debug!(temp = %temp.path().display(), "Writing to temporary file");

    temp.write_all(bytes)
        .and_then(|()| temp.flush())
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|err| {
            ScanbinError::Encode(format!("short write to {}: {}", temp.path().display(), err))
        })?;

    temp.persist(path).map_err(|err| {
        ScanbinError::Encode(format!("cannot move output into {}: {}", path.display(), err.error))
    })?;
    Ok(())
}
