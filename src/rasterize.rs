//! Page rasteriser: render every selected page to `page_NNN.png`.
//!
//! [`rasterize_source`] is the pipeline itself and works on any
//! [`PageSource`]. [`rasterize`] wires it to pdfium on a blocking thread,
//! and [`rasterize_sync`] wraps that for callers without a runtime.

use crate::config::RasterConfig;
use crate::error::PdfSliceError;
use crate::output::{RasterOutput, RasterStats, SavedImage};
use crate::pipeline::encode::{ensure_output_dir, page_file_name, save_png};
use crate::pipeline::source::PageSource;
use crate::pipeline::{input, render};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Render the selected pages of `source` into `out_dir`.
///
/// Pages are processed in ascending order; each bitmap is written and
/// dropped before the next page is rendered. The first failure aborts the
/// run, leaving files already written in place.
pub fn rasterize_source<S: PageSource + ?Sized>(
    source: &S,
    out_dir: &Path,
    config: &RasterConfig,
) -> Result<RasterOutput, PdfSliceError> {
    let start = Instant::now();
    let total_pages = source.page_count();

    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() && total_pages > 0 {
        return Err(PdfSliceError::PageOutOfRange {
            page: config.pages.first_requested(),
            total: total_pages,
        });
    }
    debug!("Selected {} of {} pages", page_indices.len(), total_pages);

    ensure_output_dir(out_dir)?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_start(page_indices.len());
    }

    let mut files = Vec::with_capacity(page_indices.len());
    for idx in page_indices {
        let page_num = idx + 1;
        let image = source.rasterize(idx, config.zoom)?;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_rendered(page_num, image.width(), image.height());
        }

        let path = out_dir.join(page_file_name(page_num));
        save_png(&image, &path)?;
        if let Some(ref cb) = config.progress_callback {
            cb.on_file_saved(&path);
        }

        files.push(SavedImage {
            path,
            page: page_num,
            question: None,
            width: image.width(),
            height: image.height(),
        });
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_complete(files.len());
    }

    let stats = RasterStats {
        total_pages,
        rendered_pages: files.len(),
        total_duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Rasterised {}/{} pages in {}ms",
        stats.rendered_pages, total_pages, stats.total_duration_ms
    );

    Ok(RasterOutput { files, stats })
}

/// Render the pages of the PDF at `pdf_path` into `out_dir`.
///
/// pdfium is not async-safe, so the whole run happens inside
/// `spawn_blocking`; pages are still processed one at a time.
pub async fn rasterize(
    pdf_path: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    config: &RasterConfig,
) -> Result<RasterOutput, PdfSliceError> {
    let pdf_path = input::resolve_local(pdf_path.as_ref())?;
    let out_dir = out_dir.as_ref().to_path_buf();
    let config = config.clone();
    info!("Rasterising {} → {}", pdf_path.display(), out_dir.display());

    tokio::task::spawn_blocking(move || {
        render::with_document(&pdf_path, config.password.as_deref(), |source| {
            rasterize_source(source, &out_dir, &config)
        })
    })
    .await
    .map_err(|e| PdfSliceError::Internal(format!("Render task panicked: {}", e)))?
}

/// Synchronous wrapper around [`rasterize`].
///
/// Creates a temporary tokio runtime internally.
pub fn rasterize_sync(
    pdf_path: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    config: &RasterConfig,
) -> Result<RasterOutput, PdfSliceError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| PdfSliceError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(rasterize(pdf_path, out_dir, config))
}
