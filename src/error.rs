//! Error type for the pdfslice library.
//!
//! Both pipelines are batch jobs with no partial-result salvage: the first
//! failure stops the run. A single fatal enum, [`PdfSliceError`], is
//! therefore enough. Variants are grouped by the stage that produces them so
//! the binaries can print a message that points at the actual cause (missing
//! pdfium library vs. corrupt PDF vs. unwritable output directory).

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdfslice library.
#[derive(Debug, Error)]
pub enum PdfSliceError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF engine errors ─────────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (file or directory).\n\
  • Place libpdfium next to the executable or in the working directory.\n\
  • Install pdfium as a system library.\n"
    )]
    PdfiumBindingFailed(String),

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// Selected page numbers exceed the actual page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium could not produce the text layer of a page.
    #[error("Text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    /// pdfium returned an error while rendering a page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The output directory could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PNG encoding or the file write failed.
    #[error("Failed to write image '{path}': {source}")]
    ImageWriteFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    // ── Cropping errors ───────────────────────────────────────────────────
    /// A crop rectangle came out empty or inverted.
    #[error(
        "Invalid crop for question {question} on page {page}: rows [{top}, {bottom}) \
in an image {height}px high"
    )]
    InvalidCrop {
        question: u32,
        page: usize,
        top: u32,
        bottom: u32,
        height: u32,
    },

    /// Strict mode: two anchors would be written to the same file.
    #[error("Output '{file_name}' would be written more than once (pages {pages:?})")]
    DuplicateOutput { file_name: String, pages: Vec<usize> },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
