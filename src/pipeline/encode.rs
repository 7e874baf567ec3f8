//! Image output: output directory creation, file naming and PNG encoding.
//!
//! PNG is lossless, so text edges in the slices stay crisp. Existing files
//! with the same name are overwritten without warning.

use crate::error::PdfSliceError;
use image::{DynamicImage, ImageFormat};
use std::path::Path;
use tracing::debug;

/// Create `dir` and any missing parents.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PdfSliceError> {
    std::fs::create_dir_all(dir).map_err(|e| PdfSliceError::OutputDirFailed {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// File name for a rendered page: `page_001.png`, `page_002.png`, …
pub fn page_file_name(page_num: usize) -> String {
    format!("page_{:03}.png", page_num)
}

/// Encode `img` as PNG at `path`.
pub fn save_png(img: &DynamicImage, path: &Path) -> Result<(), PdfSliceError> {
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|e| PdfSliceError::ImageWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    debug!(
        "Wrote {}x{} PNG → {}",
        img.width(),
        img.height(),
        path.display()
    );
    Ok(())
}
