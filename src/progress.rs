//! Progress-callback trait for per-page and per-file events.
//!
//! Inject an [`Arc<dyn SliceProgressCallback>`] via
//! [`crate::config::RasterConfigBuilder::progress_callback`] or
//! [`crate::config::CropConfigBuilder::progress_callback`]. The binaries use
//! it to print one `saved <path>` line the moment each file lands on disk, so
//! a run that dies half-way still tells the user what was written.
//!
//! # Example
//!
//! ```rust
//! use pdfslice::{RasterConfig, SliceProgressCallback};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     saved: AtomicUsize,
//! }
//!
//! impl SliceProgressCallback for CountingCallback {
//!     fn on_file_saved(&self, path: &Path) {
//!         self.saved.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("wrote {}", path.display());
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { saved: AtomicUsize::new(0) });
//!
//! let config = RasterConfig::builder()
//!     .progress_callback(counter as Arc<dyn SliceProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by both pipelines as they render pages and write files.
///
/// Pages are processed strictly in order on a single blocking thread, but the
/// callback is moved onto that thread, hence `Send + Sync`. All methods have
/// default no-op implementations so callers only override what they care
/// about.
pub trait SliceProgressCallback: Send + Sync {
    /// Called once before the first page is rendered.
    ///
    /// # Arguments
    /// * `pages_to_render`: pages that will be rasterised (for the cropper,
    ///   only pages carrying at least one anchor)
    fn on_start(&self, pages_to_render: usize) {
        let _ = pages_to_render;
    }

    /// Called after a page has been rasterised.
    ///
    /// # Arguments
    /// * `page_num`: 1-indexed page number
    /// * `width`, `height`: bitmap size in pixels
    fn on_page_rendered(&self, page_num: usize, width: u32, height: u32) {
        let _ = (page_num, width, height);
    }

    /// Called after a PNG file has been written.
    fn on_file_saved(&self, path: &Path) {
        let _ = path;
    }

    /// Called once after the last file has been written.
    fn on_complete(&self, files_written: usize) {
        let _ = files_written;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SliceProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in the config structs.
pub type ProgressCallback = Arc<dyn SliceProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingCallback {
        saved: Mutex<Vec<PathBuf>>,
        rendered: Mutex<Vec<usize>>,
    }

    impl SliceProgressCallback for RecordingCallback {
        fn on_page_rendered(&self, page_num: usize, _width: u32, _height: u32) {
            self.rendered.lock().unwrap().push(page_num);
        }

        fn on_file_saved(&self, path: &Path) {
            self.saved.lock().unwrap().push(path.to_path_buf());
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_start(2);
        cb.on_page_rendered(1, 100, 200);
        cb.on_file_saved(Path::new("out/page_001.png"));
        cb.on_complete(1);
    }

    #[test]
    fn recording_callback_receives_events_in_order() {
        let cb = RecordingCallback::default();
        cb.on_page_rendered(1, 10, 10);
        cb.on_file_saved(Path::new("a.png"));
        cb.on_page_rendered(3, 10, 10);
        cb.on_file_saved(Path::new("b.png"));

        assert_eq!(*cb.rendered.lock().unwrap(), vec![1, 3]);
        assert_eq!(
            *cb.saved.lock().unwrap(),
            vec![PathBuf::from("a.png"), PathBuf::from("b.png")]
        );
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_start(10);
        cb.on_file_saved(Path::new("q1.png"));
    }
}
