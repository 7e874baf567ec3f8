//! Input validation: check the user-supplied path before pdfium sees it.
//!
//! pdfium reports a missing file, an unreadable file and a JPEG renamed to
//! `.pdf` with the same opaque "format error". Checking existence,
//! permissions and the `%PDF` magic bytes up front turns those into distinct
//! [`PdfSliceError`] variants with actionable messages.

use crate::error::PdfSliceError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate that `path` exists, is readable and starts with `%PDF`.
pub fn resolve_local(path: &Path) -> Result<PathBuf, PdfSliceError> {
    let path = path.to_path_buf();

    if !path.exists() {
        return Err(PdfSliceError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(PdfSliceError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PdfSliceError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(PdfSliceError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}
