//! Question cropper: slice pages at `問n` headers into `{prefix}{n}.png`.
//!
//! Runs in two phases. [`scan_anchors`] reads the text layer of every page
//! and builds an [`AnchorPlan`] without rendering anything. [`crop_source`]
//! then renders only the pages that carry anchors and writes one slice per
//! anchor. Keeping the phases apart means a document with no headers costs
//! no rasterisation at all, and strict mode can reject duplicate file names
//! before a single file is written.

use crate::config::CropConfig;
use crate::error::PdfSliceError;
use crate::output::{CropOutput, CropStats, SavedImage};
use crate::pipeline::anchors::{Anchor, AnchorPlan};
use crate::pipeline::encode::{ensure_output_dir, save_png};
use crate::pipeline::slice::{crop_span, plan_spans};
use crate::pipeline::source::PageSource;
use crate::pipeline::{input, render};
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Analysis phase: find every in-range header in `source`.
///
/// In strict mode a question number found more than once is an error.
pub fn scan_anchors<S: PageSource + ?Sized>(
    source: &S,
    config: &CropConfig,
) -> Result<AnchorPlan, PdfSliceError> {
    let plan = AnchorPlan::scan(source, config.questions)?;
    info!(
        "Found {} anchors on {} of {} pages",
        plan.len(),
        plan.page_count(),
        source.page_count()
    );

    for (question, pages) in plan.duplicate_questions() {
        if config.strict {
            return Err(PdfSliceError::DuplicateOutput {
                file_name: config.file_name(question),
                pages,
            });
        }
        warn!(
            "Question {} appears {} times (pages {:?}); later slices overwrite earlier ones",
            question,
            pages.len(),
            pages
        );
    }

    Ok(plan)
}

/// Run both phases against `source`, writing slices into `out_dir`.
pub fn crop_source<S: PageSource + ?Sized>(
    source: &S,
    out_dir: &Path,
    config: &CropConfig,
) -> Result<CropOutput, PdfSliceError> {
    let start = Instant::now();
    ensure_output_dir(out_dir)?;

    let plan = scan_anchors(source, config)?;
    let scan_duration_ms = start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress_callback {
        cb.on_start(plan.page_count());
    }

    let mut files = Vec::with_capacity(plan.len());
    let mut written: HashSet<String> = HashSet::new();
    let mut overwritten_files = 0;

    for (page, anchors) in plan.pages() {
        let image = source.rasterize(page, config.zoom)?;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_rendered(page + 1, image.width(), image.height());
        }

        for span in plan_spans(anchors, config.zoom, config.margin_px, image.height()) {
            let slice = crop_span(&image, &span)?;
            let file_name = config.file_name(span.question);
            let path = out_dir.join(&file_name);
            save_png(&slice, &path)?;
            debug!(
                "Question {} on page {}: rows [{}, {})",
                span.question,
                page + 1,
                span.top,
                span.bottom
            );

            if !written.insert(file_name) {
                overwritten_files += 1;
            }
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_saved(&path);
            }

            files.push(SavedImage {
                path,
                page: page + 1,
                question: Some(span.question),
                width: slice.width(),
                height: slice.height(),
            });
        }
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_complete(files.len());
    }

    let stats = CropStats {
        total_pages: source.page_count(),
        rendered_pages: plan.page_count(),
        overwritten_files,
        scan_duration_ms,
        total_duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Wrote {} slices from {} pages in {}ms",
        files.len(),
        stats.rendered_pages,
        stats.total_duration_ms
    );

    Ok(CropOutput {
        anchors: plan.anchors(),
        files,
        stats,
    })
}

/// Slice the PDF at `pdf_path` into per-question images in `out_dir`.
///
/// pdfium is not async-safe, so the whole run happens inside
/// `spawn_blocking`; pages are still processed one at a time.
pub async fn crop_questions(
    pdf_path: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    config: &CropConfig,
) -> Result<CropOutput, PdfSliceError> {
    let pdf_path = input::resolve_local(pdf_path.as_ref())?;
    let out_dir = out_dir.as_ref().to_path_buf();
    let config = config.clone();
    info!("Cropping {} → {}", pdf_path.display(), out_dir.display());

    tokio::task::spawn_blocking(move || {
        render::with_document(&pdf_path, config.password.as_deref(), |source| {
            crop_source(source, &out_dir, &config)
        })
    })
    .await
    .map_err(|e| PdfSliceError::Internal(format!("Crop task panicked: {}", e)))?
}

/// Synchronous wrapper around [`crop_questions`].
///
/// Creates a temporary tokio runtime internally.
pub fn crop_questions_sync(
    pdf_path: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    config: &CropConfig,
) -> Result<CropOutput, PdfSliceError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| PdfSliceError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(crop_questions(pdf_path, out_dir, config))
}

/// Detect anchors without rendering or writing anything.
///
/// Backs the cropper's `--dry-run`. Strict mode applies here too.
pub async fn detect_anchors(
    pdf_path: impl AsRef<Path>,
    config: &CropConfig,
) -> Result<Vec<Anchor>, PdfSliceError> {
    let pdf_path = input::resolve_local(pdf_path.as_ref())?;
    let config = config.clone();

    tokio::task::spawn_blocking(move || {
        render::with_document(&pdf_path, config.password.as_deref(), |source| {
            scan_anchors(source, &config).map(|plan| plan.anchors())
        })
    })
    .await
    .map_err(|e| PdfSliceError::Internal(format!("Scan task panicked: {}", e)))?
}
