//! Configuration types for both pipelines.
//!
//! [`RasterConfig`] drives the page rasteriser, [`CropConfig`] drives the
//! question cropper. Each is built through a builder whose `build()` is the
//! single place where values are validated, so the pipelines can assume a
//! finite positive zoom and a non-inverted question range.

use crate::error::PdfSliceError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Linear scale applied to page dimensions when none is given.
pub const DEFAULT_ZOOM: f32 = 2.0;

/// Pixels subtracted from each anchor's scaled y so the header glyphs are not
/// cut at the top edge of a slice.
pub const DEFAULT_MARGIN_PX: u32 = 10;

/// File name prefix for question slices (`q1.png`, `q2.png`, …).
pub const DEFAULT_PREFIX: &str = "q";

/// Lowest question number accepted by default.
pub const DEFAULT_MIN_Q: u32 = 1;

/// Highest question number accepted by default.
pub const DEFAULT_MAX_Q: u32 = 18;

fn validate_zoom(zoom: f32) -> Result<(), PdfSliceError> {
    if !zoom.is_finite() || zoom <= 0.0 {
        return Err(PdfSliceError::InvalidConfig(format!(
            "Zoom must be a finite number > 0, got {}",
            zoom
        )));
    }
    Ok(())
}

// ── Page rasteriser ──────────────────────────────────────────────────────

/// Configuration for rendering every (selected) page to its own PNG.
///
/// # Example
/// ```rust
/// use pdfslice::{PageSelection, RasterConfig};
///
/// let config = RasterConfig::builder()
///     .zoom(3.0)
///     .pages(PageSelection::Range(1, 4))
///     .build()
///     .unwrap();
/// assert_eq!(config.zoom, 3.0);
/// ```
#[derive(Clone)]
pub struct RasterConfig {
    /// Linear scale factor. Default: 2.0 (144 DPI for a 72 pt/inch page).
    pub zoom: f32,

    /// Page selection. Default: all pages.
    pub pages: PageSelection,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Receives an event for every file written.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            pages: PageSelection::default(),
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RasterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterConfig")
            .field("zoom", &self.zoom)
            .field("pages", &self.pages)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn SliceProgressCallback>"),
            )
            .finish()
    }
}

impl RasterConfig {
    /// Create a new builder for `RasterConfig`.
    pub fn builder() -> RasterConfigBuilder {
        RasterConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RasterConfig`].
#[derive(Debug)]
pub struct RasterConfigBuilder {
    config: RasterConfig,
}

impl RasterConfigBuilder {
    pub fn zoom(mut self, zoom: f32) -> Self {
        self.config.zoom = zoom;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RasterConfig, PdfSliceError> {
        validate_zoom(self.config.zoom)?;
        Ok(self.config)
    }
}

// ── Question cropper ─────────────────────────────────────────────────────

/// Inclusive range of question numbers that produce anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRange {
    pub min: u32,
    pub max: u32,
}

impl QuestionRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, question: u32) -> bool {
        self.min <= question && question <= self.max
    }
}

impl Default for QuestionRange {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_Q, DEFAULT_MAX_Q)
    }
}

/// Configuration for slicing pages at `問n` headers.
///
/// # Example
/// ```rust
/// use pdfslice::CropConfig;
///
/// let config = CropConfig::builder()
///     .prefix("exam2024_q")
///     .question_range(1, 25)
///     .margin_px(16)
///     .build()
///     .unwrap();
/// assert_eq!(config.file_name(7), "exam2024_q7.png");
/// ```
#[derive(Clone)]
pub struct CropConfig {
    /// Linear scale factor. Default: 2.0.
    pub zoom: f32,

    /// Output file name prefix. Default: `"q"`.
    pub prefix: String,

    /// Accepted question numbers. Default: 1..=18.
    pub questions: QuestionRange,

    /// Pixels subtracted from each anchor's scaled y. Default: 10.
    ///
    /// A layout heuristic rather than a computed guarantee: it assumes the
    /// header glyphs sit within this many pixels below the text block's top.
    pub margin_px: u32,

    /// Fail before rendering when two anchors map to the same file name.
    /// Default: false (later anchors silently overwrite earlier ones).
    pub strict: bool,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Receives an event for every file written.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            prefix: DEFAULT_PREFIX.to_string(),
            questions: QuestionRange::default(),
            margin_px: DEFAULT_MARGIN_PX,
            strict: false,
            password: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for CropConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CropConfig")
            .field("zoom", &self.zoom)
            .field("prefix", &self.prefix)
            .field("questions", &self.questions)
            .field("margin_px", &self.margin_px)
            .field("strict", &self.strict)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn SliceProgressCallback>"),
            )
            .finish()
    }
}

impl CropConfig {
    /// Create a new builder for `CropConfig`.
    pub fn builder() -> CropConfigBuilder {
        CropConfigBuilder {
            config: Self::default(),
        }
    }

    /// Output file name for a question number.
    pub fn file_name(&self, question: u32) -> String {
        format!("{}{}.png", self.prefix, question)
    }
}

/// Builder for [`CropConfig`].
#[derive(Debug)]
pub struct CropConfigBuilder {
    config: CropConfig,
}

impl CropConfigBuilder {
    pub fn zoom(mut self, zoom: f32) -> Self {
        self.config.zoom = zoom;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    pub fn question_range(mut self, min_q: u32, max_q: u32) -> Self {
        self.config.questions = QuestionRange::new(min_q, max_q);
        self
    }

    pub fn margin_px(mut self, px: u32) -> Self {
        self.config.margin_px = px;
        self
    }

    pub fn strict(mut self, v: bool) -> Self {
        self.config.strict = v;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CropConfig, PdfSliceError> {
        let c = &self.config;
        validate_zoom(c.zoom)?;
        if c.questions.min > c.questions.max {
            return Err(PdfSliceError::InvalidConfig(format!(
                "min_q ({}) must be <= max_q ({})",
                c.questions.min, c.questions.max
            )));
        }
        if c.prefix.contains(['/', '\\']) {
            return Err(PdfSliceError::InvalidConfig(format!(
                "Prefix must not contain path separators, got '{}'",
                c.prefix
            )));
        }
        Ok(self.config)
    }
}

// ── Page selection ───────────────────────────────────────────────────────

/// Specifies which pages of the PDF to rasterise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Every page (default).
    #[default]
    All,
    /// A single page (1-indexed).
    Single(usize),
    /// A contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// The first requested page number, used when reporting an empty selection.
    pub fn first_requested(&self) -> usize {
        match self {
            PageSelection::All => 1,
            PageSelection::Single(p) => *p,
            PageSelection::Range(start, _) => *start,
            PageSelection::Set(pages) => pages.iter().copied().min().unwrap_or(0),
        }
    }
}

/// Parses `all`, `5`, `3-15` or `1,3,5,7`.
impl FromStr for PageSelection {
    type Err = PdfSliceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let page = |p: &str| -> Result<usize, PdfSliceError> {
            let n: usize = p.trim().parse().map_err(|_| {
                PdfSliceError::InvalidConfig(format!("Invalid page number: '{}'", p.trim()))
            })?;
            if n < 1 {
                return Err(PdfSliceError::InvalidConfig(format!(
                    "Pages are 1-indexed, minimum is 1 (got {})",
                    n
                )));
            }
            Ok(n)
        };

        if s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            let (start, end) = (page(start)?, page(end)?);
            if start > end {
                return Err(PdfSliceError::InvalidConfig(format!(
                    "Invalid page range '{}-{}': start must be <= end",
                    start, end
                )));
            }
            return Ok(PageSelection::Range(start, end));
        }

        if s.contains(',') {
            let pages = s.split(',').map(page).collect::<Result<Vec<_>, _>>()?;
            return Ok(PageSelection::Set(pages));
        }

        Ok(PageSelection::Single(page(&s)?))
    }
}
