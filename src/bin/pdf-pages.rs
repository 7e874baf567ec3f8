//! CLI binary: render every page of a PDF to `page_NNN.png`.
//!
//! A thin shim over [`pdfslice::rasterize`] that maps flags to
//! `RasterConfig` and prints one `saved` line per file.

use anyhow::{Context, Result};
use clap::Parser;
use pdfslice::cli::{init_logging, SavedLinePrinter};
use pdfslice::{rasterize, PageSelection, RasterConfig, SliceProgressCallback, DEFAULT_ZOOM};
use std::path::PathBuf;
use std::sync::Arc;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Every page at 2x (144 DPI)
  pdf-pages --pdf exam.pdf --out pages

  # Pages 3 to 6 at 3x
  pdf-pages --pdf exam.pdf --out pages --zoom 3 --pages 3-6

  # Machine-readable summary
  pdf-pages --pdf exam.pdf --out pages --json > pages.json

OUTPUT:
  {out}/page_001.png, {out}/page_002.png, …  (1-indexed, existing files overwritten)

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to libpdfium (file or directory)
  RUST_LOG          Log filter, e.g. RUST_LOG=pdfslice=debug
"#;

/// Render every page of a PDF to a PNG file.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-pages",
    version,
    about = "Render every page of a PDF to a PNG file",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input PDF file.
    #[arg(long)]
    pdf: PathBuf,

    /// Output directory (created if missing).
    #[arg(long)]
    out: PathBuf,

    /// Linear scale factor applied to the page size.
    #[arg(long, default_value_t = DEFAULT_ZOOM)]
    zoom: f32,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, default_value = "all")]
    pages: PageSelection,

    /// PDF user password for encrypted documents.
    #[arg(long)]
    password: Option<String>,

    /// Print a JSON summary instead of `saved` lines.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    let output = rasterize(&cli.pdf, &cli.out, &config)
        .await
        .with_context(|| format!("Failed to rasterise {}", cli.pdf.display()))?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
    }

    Ok(())
}

/// Map CLI args to `RasterConfig`.
fn build_config(cli: &Cli) -> Result<RasterConfig> {
    let mut builder = RasterConfig::builder()
        .zoom(cli.zoom)
        .pages(cli.pages.clone());

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if !cli.quiet && !cli.json {
        builder = builder
            .progress_callback(Arc::new(SavedLinePrinter) as Arc<dyn SliceProgressCallback>);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["pdf-pages", "--pdf", "exam.pdf", "--out", "pages"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.zoom, 2.0);
        assert_eq!(cli.pages, PageSelection::All);
        assert!(cli.password.is_none());

        let config = build_config(&cli).unwrap();
        assert!(config.progress_callback.is_some());
    }

    #[test]
    fn page_selection_is_parsed() {
        assert_eq!(parse(&["--pages", "3-6"]).pages, PageSelection::Range(3, 6));
        assert_eq!(
            parse(&["--pages", "1,3"]).pages,
            PageSelection::Set(vec![1, 3])
        );
        assert!(Cli::try_parse_from([
            "pdf-pages", "--pdf", "a.pdf", "--out", "o", "--pages", "0"
        ])
        .is_err());
    }

    #[test]
    fn quiet_suppresses_saved_lines() {
        let config = build_config(&parse(&["-q"])).unwrap();
        assert!(config.progress_callback.is_none());
    }

    #[test]
    fn non_positive_zoom_is_rejected() {
        assert!(build_config(&parse(&["--zoom", "0"])).is_err());
    }
}
