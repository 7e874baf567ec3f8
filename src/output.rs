//! Result types returned by the two pipelines.

use crate::pipeline::anchors::Anchor;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One PNG written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedImage {
    pub path: PathBuf,
    /// 1-indexed source page.
    pub page: usize,
    /// Question number, for slices written by the cropper.
    pub question: Option<u32>,
    pub width: u32,
    pub height: u32,
}

/// Outcome of a page-rasteriser run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterOutput {
    /// Files in the order they were written.
    pub files: Vec<SavedImage>,
    pub stats: RasterStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RasterStats {
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages rendered (the selection).
    pub rendered_pages: usize,
    pub total_duration_ms: u64,
}

/// Outcome of a question-cropper run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropOutput {
    /// Every anchor found, in processing order (page, then y).
    pub anchors: Vec<Anchor>,
    /// Files in the order they were written. A path may appear more than once
    /// when a question number repeats; the last entry is what is on disk.
    pub files: Vec<SavedImage>,
    pub stats: CropStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CropStats {
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages that carried at least one anchor and were rendered.
    pub rendered_pages: usize,
    /// Writes that replaced a file produced earlier in the same run.
    pub overwritten_files: usize,
    /// Time spent scanning text for headers.
    pub scan_duration_ms: u64,
    pub total_duration_ms: u64,
}

impl CropOutput {
    /// Distinct paths left on disk, in first-write order.
    pub fn surviving_paths(&self) -> Vec<&PathBuf> {
        let mut paths: Vec<&PathBuf> = Vec::new();
        for file in &self.files {
            if !paths.contains(&&file.path) {
                paths.push(&file.path);
            }
        }
        paths
    }
}
