//! End-to-end tests for pdfslice against real PDF files and a real pdfium.
//!
//! Tests that need pdfium are gated behind the `E2E_ENABLED` environment
//! variable and read their input from `./test_cases/`. Point
//! `PDFIUM_LIB_PATH` at the library if it is not installed system-wide.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=/opt/pdfium/lib cargo test --test e2e -- --nocapture
//!
//! Expected files:
//!   test_cases/exam.pdf    a paper with 問n headers
//!   test_cases/plain.pdf   any PDF without 問n headers

use pdfslice::{
    crop_questions, crop_questions_sync, detect_anchors, rasterize, rasterize_sync, CropConfig,
    PageSelection, PdfSliceError, RasterConfig,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

/// Route pipeline logs through the test harness; `RUST_LOG` overrides.
fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pdfslice=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Skip this test if E2E_ENABLED is not set *or* no PDF file at `path`.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        init_test_logging();
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP — test file not found: {}", p.display());
            return;
        }
        p
    }};
}

fn png_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".png"))
        .collect();
    names.sort();
    names
}

// ── Input validation (no pdfium needed) ──────────────────────────────────────

#[tokio::test]
async fn test_missing_pdf_is_reported_before_output_dir() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("out");

    let err = rasterize(tmp.path().join("nope.pdf"), &out, &RasterConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PdfSliceError::FileNotFound { .. }), "{err:?}");
    assert!(!out.exists());
}

#[tokio::test]
async fn test_non_pdf_input_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let fake = tmp.path().join("fake.pdf");
    std::fs::write(&fake, b"PK\x03\x04 not a pdf").unwrap();
    let out = tmp.path().join("out");

    let err = crop_questions(&fake, &out, &CropConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PdfSliceError::NotAPdf { .. }), "{err:?}");
    assert!(!out.exists());
}

// ── Page rasteriser ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_rasterize_exam() {
    let pdf = e2e_skip_unless_ready!(test_cases_dir().join("exam.pdf"));
    let out = TempDir::new().unwrap();

    let output = rasterize(&pdf, out.path(), &RasterConfig::default())
        .await
        .expect("rasterize failed");

    assert!(!output.files.is_empty());
    assert_eq!(output.files.len(), output.stats.total_pages);
    for (i, file) in output.files.iter().enumerate() {
        assert_eq!(
            file.path.file_name().unwrap().to_string_lossy(),
            format!("page_{:03}.png", i + 1)
        );
        let img = image::open(&file.path).expect("unreadable png");
        assert_eq!((img.width(), img.height()), (file.width, file.height));
    }
    println!("{} pages → {}", output.files.len(), out.path().display());
}

#[test]
fn test_rasterize_sync_zoom_scales_dimensions() {
    let pdf = e2e_skip_unless_ready!(test_cases_dir().join("exam.pdf"));
    let out1 = TempDir::new().unwrap();
    let out2 = TempDir::new().unwrap();
    let first = PageSelection::Single(1);

    let one = RasterConfig::builder()
        .zoom(1.0)
        .pages(first.clone())
        .build()
        .unwrap();
    let two = RasterConfig::builder().zoom(2.0).pages(first).build().unwrap();

    let a = rasterize_sync(&pdf, out1.path(), &one).expect("zoom 1 failed");
    let b = rasterize_sync(&pdf, out2.path(), &two).expect("zoom 2 failed");

    let (a, b) = (&a.files[0], &b.files[0]);
    assert!(b.width.abs_diff(a.width * 2) <= 1, "{} vs {}", a.width, b.width);
    assert!(b.height.abs_diff(a.height * 2) <= 1, "{} vs {}", a.height, b.height);
}

#[tokio::test]
async fn test_password_reaches_pdfium() {
    // pdfium ignores a password on an unencrypted document.
    let pdf = e2e_skip_unless_ready!(test_cases_dir().join("exam.pdf"));
    let out = TempDir::new().unwrap();
    let config = RasterConfig::builder()
        .pages(PageSelection::Single(1))
        .password("unused")
        .build()
        .unwrap();

    let output = rasterize(&pdf, out.path(), &config)
        .await
        .expect("rasterize with password failed");
    assert_eq!(output.files.len(), 1);
}

#[tokio::test]
async fn test_corrupt_pdf_is_rejected() {
    let _ = e2e_skip_unless_ready!(test_cases_dir().join("exam.pdf"));
    let tmp = TempDir::new().unwrap();
    let broken = tmp.path().join("broken.pdf");
    std::fs::write(&broken, b"%PDF-1.7\n garbage without xref").unwrap();

    let err = rasterize(&broken, tmp.path().join("out"), &RasterConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PdfSliceError::CorruptPdf { .. }), "{err:?}");
}

// ── Question cropper ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_crop_exam() {
    let pdf = e2e_skip_unless_ready!(test_cases_dir().join("exam.pdf"));
    let out = TempDir::new().unwrap();
    let config = CropConfig::default();

    let anchors = detect_anchors(&pdf, &config).await.expect("scan failed");
    assert!(!anchors.is_empty(), "exam.pdf should contain 問n headers");

    let output = crop_questions(&pdf, out.path(), &config)
        .await
        .expect("crop failed");

    assert_eq!(output.files.len(), anchors.len());
    let expected: HashSet<String> = anchors
        .iter()
        .map(|a| config.file_name(a.question))
        .collect();
    let written: HashSet<String> = png_names(out.path()).into_iter().collect();
    assert_eq!(written, expected);

    for file in &output.files {
        assert!(file.height > 0);
        assert!(file.question.is_some());
    }
    for line in output.surviving_paths() {
        println!("saved {}", line.display());
    }
}

#[test]
fn test_crop_plain_writes_nothing() {
    let pdf = e2e_skip_unless_ready!(test_cases_dir().join("plain.pdf"));
    let out = TempDir::new().unwrap();

    let output =
        crop_questions_sync(&pdf, out.path(), &CropConfig::default()).expect("crop failed");

    assert!(output.files.is_empty());
    assert_eq!(output.stats.rendered_pages, 0);
    assert!(png_names(out.path()).is_empty());
}
