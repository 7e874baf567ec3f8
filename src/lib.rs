//! # pdfslice
//!
//! Turn PDF pages into PNG images, either whole or sliced at numbered
//! question headers (`問1`, `問2`, …).
//!
//! ## Two pipelines
//!
//! ```text
//! rasterise   PDF ──▶ every page ──▶ page_001.png, page_002.png, …
//!
//! crop        PDF ──▶ scan text for 問n ──▶ render pages with anchors
//!                 ──▶ slice between consecutive anchors ──▶ q1.png, q2.png, …
//! ```
//!
//! Both run on pdfium via `pdfium-render`, strictly one page at a time.
//! Each is available as an async function, a blocking `*_sync` wrapper, and
//! a `*_source` function over any [`PageSource`] for testing without pdfium.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfslice::{crop_questions, CropConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CropConfig::builder().zoom(2.0).question_range(1, 18).build()?;
//!     let output = crop_questions("exam.pdf", "out", &config).await?;
//!     for file in &output.files {
//!         println!("saved {}", file.path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf-pages` and `pdf-questions` binaries (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod crop;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod rasterize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    CropConfig, CropConfigBuilder, PageSelection, QuestionRange, RasterConfig,
    RasterConfigBuilder, DEFAULT_MARGIN_PX, DEFAULT_MAX_Q, DEFAULT_MIN_Q, DEFAULT_PREFIX,
    DEFAULT_ZOOM,
};
pub use crop::{crop_questions, crop_questions_sync, crop_source, detect_anchors, scan_anchors};
pub use error::PdfSliceError;
pub use output::{CropOutput, CropStats, RasterOutput, RasterStats, SavedImage};
pub use pipeline::anchors::{match_header, Anchor, AnchorPlan};
pub use pipeline::slice::CropSpan;
pub use pipeline::source::{PageSource, TextBlock};
pub use progress::{NoopProgressCallback, ProgressCallback, SliceProgressCallback};
pub use rasterize::{rasterize, rasterize_source, rasterize_sync};
