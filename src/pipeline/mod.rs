//! Pipeline stages shared by the page rasteriser and the question cropper.
//!
//! Each submodule implements exactly one step, and only [`render`] talks to
//! pdfium, so everything else runs against the [`source::PageSource`] seam.
//!
//! ## Data Flow
//!
//! ```text
//! page rasteriser:   input ──▶ render ─────────────────────────▶ encode
//! question cropper:  input ──▶ render(text) ──▶ anchors ──▶ render(bitmap) ──▶ slice ──▶ encode
//! ```
//!
//! 1. [`input`]: validate the PDF path and magic bytes
//! 2. [`source`]: the `PageSource` trait, `TextBlock`, line grouping
//! 3. [`render`]: pdfium binding, text runs, rasterisation
//! 4. [`anchors`]: `問n` header matching and the per-page anchor plan
//! 5. [`slice`]: row spans between consecutive anchors and cropping
//! 6. [`encode`]: output directory, file names, PNG writing

pub mod anchors;
pub mod encode;
pub mod input;
pub mod render;
pub mod slice;
pub mod source;
