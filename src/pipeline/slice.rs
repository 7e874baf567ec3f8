//! Crop geometry: turn a page's sorted anchors into pixel row spans.
//!
//! Each slice starts `margin` pixels above its own anchor and ends where the
//! next slice on the same page starts, so consecutive slices share exactly
//! one boundary row and never overlap. The last slice runs to the bottom of
//! the bitmap.

use crate::error::PdfSliceError;
use crate::pipeline::anchors::Anchor;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// A full-width horizontal band `[top, bottom)` of a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropSpan {
    pub question: u32,
    /// 0-based page index.
    pub page: usize,
    pub top: u32,
    pub bottom: u32,
}

impl CropSpan {
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

/// Pixel row where a slice for an anchor at `y` points begins:
/// `round(y * zoom) - margin`, clamped at 0.
pub fn slice_top(y: f32, zoom: f32, margin: u32) -> u32 {
    let scaled = ((y as f64) * (zoom as f64)).round() as i64;
    (scaled - margin as i64).max(0) as u32
}

/// Row spans for one page's anchors, which must already be sorted by `y`.
pub fn plan_spans(anchors: &[Anchor], zoom: f32, margin: u32, image_height: u32) -> Vec<CropSpan> {
    anchors
        .iter()
        .enumerate()
        .map(|(i, anchor)| {
            let top = slice_top(anchor.y, zoom, margin);
            let bottom = anchors
                .get(i + 1)
                .map(|next| slice_top(next.y, zoom, margin))
                .unwrap_or(image_height);
            CropSpan {
                question: anchor.question,
                page: anchor.page,
                top,
                bottom,
            }
        })
        .collect()
}

/// Cut `span` out of `image`.
///
/// A span that is empty, inverted, or starts at or below the last row is an
/// error. A bottom edge past the image is clipped to the image height.
pub fn crop_span(image: &DynamicImage, span: &CropSpan) -> Result<DynamicImage, PdfSliceError> {
    let height = image.height();
    let bottom = span.bottom.min(height);
    if span.top >= bottom {
        return Err(PdfSliceError::InvalidCrop {
            question: span.question,
            page: span.page + 1,
            top: span.top,
            bottom: span.bottom,
            height,
        });
    }
    Ok(image.crop_imm(0, span.top, image.width(), bottom - span.top))
}
