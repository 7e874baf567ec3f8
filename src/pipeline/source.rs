//! The document seam between the pipelines and the PDF engine.
//!
//! Both pipelines only need three things from a PDF: how many pages it has,
//! the positioned text on a page, and a bitmap of a page at some zoom.
//! [`PageSource`] captures exactly that, so anchor detection and cropping run
//! against an in-memory fake in tests and against pdfium
//! ([`crate::pipeline::render::PdfiumSource`]) in production.

use crate::error::PdfSliceError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// A run of text with its bounding box in page space.
///
/// Coordinates are PDF points with the origin at the **top-left** corner of
/// the page and y growing downward, so `y0 < y1` and a smaller `y0` means
/// higher on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    /// Block text; may span several lines separated by `\n`.
    pub text: String,
}

impl TextBlock {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32, text: impl Into<String>) -> Self {
        Self {
            x0,
            y0,
            x1,
            y1,
            text: text.into(),
        }
    }

    fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }
}

/// Read-only access to the pages of an opened document.
///
/// Page indices are 0-based.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Positioned text blocks of a page, in no particular order.
    fn text_blocks(&self, page: usize) -> Result<Vec<TextBlock>, PdfSliceError>;

    /// Rasterise a page to an opaque RGB bitmap of
    /// `round(width * zoom) × round(height * zoom)` pixels.
    fn rasterize(&self, page: usize, zoom: f32) -> Result<DynamicImage, PdfSliceError>;
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn text_blocks(&self, page: usize) -> Result<Vec<TextBlock>, PdfSliceError> {
        (**self).text_blocks(page)
    }

    fn rasterize(&self, page: usize, zoom: f32) -> Result<DynamicImage, PdfSliceError> {
        (**self).rasterize(page, zoom)
    }
}

/// Horizontal gap, in line heights, beyond which runs on one baseline belong
/// to different lines (a margin number, a label, a second column).
const LINE_SPLIT_GAP: f32 = 2.0;

/// Gap, in line heights, beyond which two runs on one line get a space.
const WORD_GAP: f32 = 0.25;

/// Vertical gap, in line heights, up to which consecutive lines share a block.
const BLOCK_LINE_GAP: f32 = 0.5;

/// Left-edge tolerance, in line heights, for lines of one block.
const BLOCK_EDGE_TOLERANCE: f32 = 0.5;

/// Merge text runs that sit on the same visual line into single-line blocks.
///
/// pdfium reports text as short runs that break at every font change, so a
/// header like `問1` may arrive as two runs `問` and `1`. Runs are ordered top
/// to bottom, then left to right; a run joins the current row when its
/// vertical center falls inside the row's first run. A row is then cut into
/// separate lines wherever the horizontal gap exceeds
/// `LINE_SPLIT_GAP` line heights, so text left of a header on the same
/// baseline never ends up in front of it.
pub fn group_into_lines(mut runs: Vec<TextBlock>) -> Vec<TextBlock> {
    runs.retain(|r| !r.text.trim().is_empty());
    runs.sort_by(|a, b| a.y0.total_cmp(&b.y0).then(a.x0.total_cmp(&b.x0)));

    let mut lines: Vec<TextBlock> = Vec::new();
    let mut row: Vec<TextBlock> = Vec::new();

    for run in runs {
        let joins = row.first().is_some_and(|first| {
            let c = run.center_y();
            c >= first.y0 && c <= first.y1
        });
        if !joins && !row.is_empty() {
            lines.extend(split_row(std::mem::take(&mut row)));
        }
        row.push(run);
    }
    if !row.is_empty() {
        lines.extend(split_row(row));
    }

    lines
}

fn split_row(mut runs: Vec<TextBlock>) -> Vec<TextBlock> {
    runs.sort_by(|a, b| a.x0.total_cmp(&b.x0));

    let mut lines: Vec<TextBlock> = Vec::new();
    let mut runs = runs.into_iter();
    let Some(mut line) = runs.next() else {
        return lines;
    };

    for run in runs {
        let gap = run.x0 - line.x1;
        let height = line.height().max(run.height());
        if gap > height * LINE_SPLIT_GAP {
            lines.push(std::mem::replace(&mut line, run));
            continue;
        }
        if gap > height * WORD_GAP && !line.text.ends_with(' ') {
            line.text.push(' ');
        }
        line.text.push_str(&run.text);
        line.x0 = line.x0.min(run.x0);
        line.y0 = line.y0.min(run.y0);
        line.x1 = line.x1.max(run.x1);
        line.y1 = line.y1.max(run.y1);
    }
    lines.push(line);
    lines
}

/// Cluster single-line blocks into paragraph blocks.
///
/// A line continues a block when it starts at the block's left edge (within
/// `BLOCK_EDGE_TOLERANCE` line heights) and begins no more than
/// `BLOCK_LINE_GAP` line heights below the block's last line. Block text
/// joins its lines with `\n`; the block's `y0` is the top of its first line.
pub fn group_into_blocks(mut lines: Vec<TextBlock>) -> Vec<TextBlock> {
    lines.sort_by(|a, b| a.y0.total_cmp(&b.y0).then(a.x0.total_cmp(&b.x0)));

    // (block so far, its last line)
    let mut blocks: Vec<(TextBlock, TextBlock)> = Vec::new();

    for line in lines {
        let target = blocks.iter_mut().rev().find(|(block, last)| {
            let height = last.height().max(line.height());
            let gap = line.y0 - last.y1;
            line.center_y() > last.y1
                && gap <= height * BLOCK_LINE_GAP
                && (line.x0 - block.x0).abs() <= height * BLOCK_EDGE_TOLERANCE
        });

        match target {
            Some((block, last)) => {
                block.text.push('\n');
                block.text.push_str(&line.text);
                block.x0 = block.x0.min(line.x0);
                block.x1 = block.x1.max(line.x1);
                block.y1 = block.y1.max(line.y1);
                *last = line;
            }
            None => blocks.push((line.clone(), line)),
        }
    }

    blocks.into_iter().map(|(block, _)| block).collect()
}
