//! Header detection: find `問n` markers and plan one slice per marker.
//!
//! This is the analysis half of the cropper. It only reads text, never
//! rasterises, and produces an [`AnchorPlan`] that the effectful half
//! ([`crate::crop`]) consumes page by page.

use crate::config::QuestionRange;
use crate::error::PdfSliceError;
use crate::pipeline::source::{PageSource, TextBlock};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// `問`, optional whitespace, then one or two ASCII digits ending on a word
/// boundary. `問123` and `問1これは` do not match: the boundary after the
/// digits must be a non-word character or the end of the line.
static RE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^問\s*([0-9]{1,2})\b").unwrap());

/// Parse a header line, returning its question number.
///
/// Leading and trailing whitespace is ignored.
///
/// ```rust
/// use pdfslice::match_header;
///
/// assert_eq!(match_header("問1 これは"), Some(1));
/// assert_eq!(match_header("問 12 次の文章"), Some(12));
/// assert_eq!(match_header("問123"), None);
/// ```
pub fn match_header(line: &str) -> Option<u32> {
    RE_HEADER
        .captures(line.trim())
        .and_then(|caps| caps[1].parse().ok())
}

/// A detected header tying a question number to a page and a vertical position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub question: u32,
    /// 0-based page index.
    pub page: usize,
    /// Top of the header's text block, in points from the top of the page.
    pub y: f32,
}

/// The question number a block starts, if any.
///
/// Only the first line that looks like a header is considered: once a line
/// matches the pattern the rest of the block is skipped, even when that
/// number falls outside `range`.
pub fn block_question(block: &TextBlock, range: QuestionRange) -> Option<u32> {
    block
        .text
        .lines()
        .find_map(match_header)
        .filter(|&q| range.contains(q))
}

/// Anchors on one page, in block order.
pub fn page_anchors(page: usize, blocks: &[TextBlock], range: QuestionRange) -> Vec<Anchor> {
    blocks
        .iter()
        .filter_map(|block| {
            block_question(block, range).map(|question| Anchor {
                question,
                page,
                y: block.y0,
            })
        })
        .collect()
}

/// Anchors grouped by page, each group sorted top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnchorPlan {
    pages: BTreeMap<usize, Vec<Anchor>>,
}

impl AnchorPlan {
    /// Group anchors by page and stable-sort each group by `y`.
    ///
    /// Anchors with equal `y` keep their relative input order.
    pub fn from_anchors(anchors: impl IntoIterator<Item = Anchor>) -> Self {
        let mut pages: BTreeMap<usize, Vec<Anchor>> = BTreeMap::new();
        for anchor in anchors {
            pages.entry(anchor.page).or_default().push(anchor);
        }
        for group in pages.values_mut() {
            group.sort_by(|a, b| a.y.total_cmp(&b.y));
        }
        Self { pages }
    }

    /// Scan every page of `source` for headers within `range`.
    pub fn scan<S: PageSource + ?Sized>(
        source: &S,
        range: QuestionRange,
    ) -> Result<Self, PdfSliceError> {
        let mut anchors = Vec::new();
        for page in 0..source.page_count() {
            let blocks = source.text_blocks(page)?;
            let found = page_anchors(page, &blocks, range);
            debug!(
                "Page {}: {} blocks, {} anchors",
                page + 1,
                blocks.len(),
                found.len()
            );
            anchors.extend(found);
        }
        Ok(Self::from_anchors(anchors))
    }

    /// Pages carrying at least one anchor, in ascending page order.
    pub fn pages(&self) -> impl Iterator<Item = (usize, &[Anchor])> {
        self.pages.iter().map(|(&page, group)| (page, group.as_slice()))
    }

    /// Number of pages carrying at least one anchor.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total number of anchors across all pages.
    pub fn len(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All anchors in processing order (page, then y).
    pub fn anchors(&self) -> Vec<Anchor> {
        self.pages.values().flatten().copied().collect()
    }

    /// Question numbers that occur more than once, with the 1-indexed pages
    /// they occur on (a page repeats if the number repeats on it).
    pub fn duplicate_questions(&self) -> Vec<(u32, Vec<usize>)> {
        let mut seen: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for anchor in self.pages.values().flatten() {
            seen.entry(anchor.question).or_default().push(anchor.page + 1);
        }
        seen.into_iter()
            .filter(|(_, pages)| pages.len() > 1)
            .collect()
    }
}
