//! pdfium-backed [`PageSource`]: library binding, document loading, page
//! rasterisation and text-run extraction.
//!
//! ## Binding order
//!
//! 1. `PDFIUM_LIB_PATH`: a library file, or a directory containing one
//! 2. the directory of the running executable
//! 3. the working directory
//! 4. the system library search path
//!
//! ## Target size
//!
//! Output images must be exactly `round(width * zoom) × round(height * zoom)`
//! pixels. pdfium's own scaling truncates, so the pixel size is computed here
//! and handed to pdfium as an explicit target.

use crate::error::PdfSliceError;
use crate::pipeline::source::{group_into_blocks, group_into_lines, PageSource, TextBlock};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit pdfium library (file or directory).
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to a pdfium library, trying each search location in turn.
pub fn bind_pdfium() -> Result<Pdfium, PdfSliceError> {
    for candidate in library_candidates() {
        debug!("Trying pdfium at {}", candidate.display());
        if let Ok(bindings) = Pdfium::bind_to_library(&candidate) {
            info!("Bound pdfium from {}", candidate.display());
            return Ok(Pdfium::new(bindings));
        }
    }

    debug!("Trying system pdfium library");
    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| PdfSliceError::PdfiumBindingFailed(format!("{:?}", e)))
}

fn library_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(p) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        let p = PathBuf::from(p);
        if p.is_dir() {
            candidates.push(Pdfium::pdfium_platform_library_name_at_path(&p));
        } else {
            candidates.push(p);
        }
    }

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(Pdfium::pdfium_platform_library_name_at_path(&exe_dir));
    }

    candidates.push(Pdfium::pdfium_platform_library_name_at_path("./"));
    candidates
}

/// Open a PDF, mapping pdfium's load error to a specific [`PdfSliceError`].
pub fn open_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, PdfSliceError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                PdfSliceError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                PdfSliceError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            PdfSliceError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

/// Bind pdfium, open `pdf_path` and run `f` against the opened document.
///
/// The pdfium handle and the document borrow each other, so they cannot be
/// returned from one function; callers get the source for the duration of
/// the closure instead.
pub fn with_document<T>(
    pdf_path: &Path,
    password: Option<&str>,
    f: impl FnOnce(&PdfiumSource<'_>) -> Result<T, PdfSliceError>,
) -> Result<T, PdfSliceError> {
    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, pdf_path, password)?;
    let source = PdfiumSource::new(document);
    info!("PDF loaded: {} pages", source.page_count());
    f(&source)
}

/// Pixel length of a page edge of `points` at `zoom`.
pub fn scaled_len(points: f32, zoom: f32) -> u32 {
    ((points as f64) * (zoom as f64)).round().max(1.0) as u32
}

/// A [`PageSource`] over an opened pdfium document.
pub struct PdfiumSource<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumSource<'a> {
    pub fn new(document: PdfDocument<'a>) -> Self {
        Self { document }
    }

    fn page(&self, idx: usize) -> Result<PdfPage<'a>, PdfSliceError> {
        let total = self.page_count();
        if idx >= total {
            return Err(PdfSliceError::PageOutOfRange {
                page: idx + 1,
                total,
            });
        }
        self.document
            .pages()
            .get(idx as u16)
            .map_err(|e| PdfSliceError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })
    }
}

impl PageSource for PdfiumSource<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn text_blocks(&self, idx: usize) -> Result<Vec<TextBlock>, PdfSliceError> {
        let page = self.page(idx)?;
        let page_height = page.height().value;

        let text = page
            .text()
            .map_err(|e| PdfSliceError::TextExtractionFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?;

        // pdfium's origin is bottom-left; flip to top-left page space.
        let runs: Vec<TextBlock> = text
            .segments()
            .iter()
            .map(|segment| {
                let bounds = segment.bounds();
                TextBlock::new(
                    bounds.left().value,
                    page_height - bounds.top().value,
                    bounds.right().value,
                    page_height - bounds.bottom().value,
                    segment.text(),
                )
            })
            .collect();

        let lines = group_into_lines(runs);
        let blocks = group_into_blocks(lines);
        debug!("Page {}: {} text blocks", idx + 1, blocks.len());
        Ok(blocks)
    }

    fn rasterize(&self, idx: usize, zoom: f32) -> Result<DynamicImage, PdfSliceError> {
        let page = self.page(idx)?;
        let width = scaled_len(page.width().value, zoom);
        let height = scaled_len(page.height().value, zoom);

        let render_config = PdfRenderConfig::new()
            .set_target_width(width as i32)
            .set_target_height(height as i32);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            PdfSliceError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            }
        })?;

        // Pages render onto a white background; drop the alpha channel.
        let image = DynamicImage::ImageRgb8(bitmap.as_image().to_rgb8());
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_len_rounds() {
        // A4 is 595.28 × 841.89 pt
        assert_eq!(scaled_len(595.28, 2.0), 1191);
        assert_eq!(scaled_len(841.89, 2.0), 1684);
        assert_eq!(scaled_len(612.0, 1.5), 918);
        assert_eq!(scaled_len(100.25, 2.0), 201);
    }

    #[test]
    fn scaled_len_never_zero() {
        assert_eq!(scaled_len(0.2, 0.1), 1);
    }

    #[test]
    fn env_override_is_first_candidate() {
        std::env::set_var(PDFIUM_LIB_PATH_ENV, "/opt/pdfium/lib/libpdfium.so");
        let candidates = library_candidates();
        std::env::remove_var(PDFIUM_LIB_PATH_ENV);
        assert_eq!(
            candidates.first(),
            Some(&PathBuf::from("/opt/pdfium/lib/libpdfium.so"))
        );
        assert!(candidates.len() >= 2);
    }
}
