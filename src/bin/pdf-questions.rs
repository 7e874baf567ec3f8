//! CLI binary: slice PDF pages at `問n` headers into `{prefix}{n}.png`.
//!
//! A thin shim over [`pdfslice::crop_questions`] that maps flags to
//! `CropConfig` and prints one `saved` line per file.

use anyhow::{Context, Result};
use clap::Parser;
use pdfslice::cli::{init_logging, SavedLinePrinter};
use pdfslice::{
    crop_questions, detect_anchors, CropConfig, SliceProgressCallback, DEFAULT_MARGIN_PX,
    DEFAULT_MAX_Q, DEFAULT_MIN_Q, DEFAULT_PREFIX, DEFAULT_ZOOM,
};
use std::path::PathBuf;
use std::sync::Arc;

const AFTER_HELP: &str = r#"EXAMPLES:
  # q1.png … q18.png from an exam paper
  pdf-questions --pdf exam.pdf --out questions

  # Custom prefix and range, fail if a number repeats
  pdf-questions --pdf exam.pdf --out questions --prefix 2024_q --min_q 1 --max_q 30 --strict

  # Show detected headers without rendering anything
  pdf-questions --pdf exam.pdf --out questions --dry-run

HOW SLICING WORKS:
  A header is a text line starting with 問, optional whitespace and a 1-2
  digit number (問1, 問 12). Each slice spans the full page width, from
  round(y * zoom) - margin of its header down to the next header on the same
  page, or to the bottom of the page. Always check the results by eye: the
  layout heuristic assumes one question column.

  A number found on several pages is written several times under the same
  name; the last page wins unless --strict is given.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to libpdfium (file or directory)
  RUST_LOG          Log filter, e.g. RUST_LOG=pdfslice=debug
"#;

/// Slice PDF pages into per-question images at 問n headers.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-questions",
    version,
    about = "Slice PDF pages into per-question PNG images at 問n headers",
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

    /// Output file name prefix.
    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Linear scale factor applied to the page size.
    #[arg(long, default_value_t = DEFAULT_ZOOM)]
    zoom: f32,

    /// Lowest accepted question number.
    #[arg(long = "min_q", visible_alias = "min-q", default_value_t = DEFAULT_MIN_Q)]
    min_q: u32,

    /// Highest accepted question number.
    #[arg(long = "max_q", visible_alias = "max-q", default_value_t = DEFAULT_MAX_Q)]
    max_q: u32,

    /// Pixels kept above each header.
    #[arg(long, default_value_t = DEFAULT_MARGIN_PX)]
    margin: u32,

    /// Fail instead of overwriting when a question number repeats.
    #[arg(long)]
    strict: bool,

    /// Print detected headers only; render and write nothing.
    #[arg(long)]
    dry_run: bool,

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

    if cli.dry_run {
        let anchors = detect_anchors(&cli.pdf, &config)
            .await
            .with_context(|| format!("Failed to scan {}", cli.pdf.display()))?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&anchors).context("Failed to serialise anchors")?
            );
        } else if !cli.quiet {
            for anchor in &anchors {
                println!(
                    "page {:>3}  問{:<2}  y={:>7.1}  → {}",
                    anchor.page + 1,
                    anchor.question,
                    anchor.y,
                    cli.out.join(config.file_name(anchor.question)).display()
                );
            }
            eprintln!("{} headers found", anchors.len());
        }
        return Ok(());
    }

    let output = crop_questions(&cli.pdf, &cli.out, &config)
        .await
        .with_context(|| format!("Failed to crop {}", cli.pdf.display()))?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
    } else if !cli.quiet && output.files.is_empty() {
        eprintln!(
            "No headers between 問{} and 問{} found; nothing written",
            cli.min_q, cli.max_q
        );
    }

    Ok(())
}

/// Map CLI args to `CropConfig`.
fn build_config(cli: &Cli) -> Result<CropConfig> {
    let mut builder = CropConfig::builder()
        .zoom(cli.zoom)
        .prefix(cli.prefix.clone())
        .question_range(cli.min_q, cli.max_q)
        .margin_px(cli.margin)
        .strict(cli.strict);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if !cli.quiet && !cli.json {
        builder = builder
            .progress_callback(Arc::new(SavedLinePrinter) as Arc<dyn SliceProgressCallback>);
    }

    builder.build().context("Invalid configuration")
}
