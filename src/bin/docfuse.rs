//! CLI binary for docfuse.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig`, wires the built-in OCR engine and MRZ reader, and
//! prints `used_ocr=<bool>` followed by the reconciled text.

use anyhow::{Context, Result};
use clap::Parser;
use docfuse::{
    extract_form_async, extract_passport_async, extract_pdf_async, ArtifactLog,
    ExtractionConfig, ExtractionProgressCallback, LayoutMode, PassKind, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a page bar that restarts when the OCR pass
/// takes over from the text layer.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening document…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn activate_bar(&self, total: usize, prefix: &'static str) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_style(progress_style);
        self.bar.set_prefix(prefix);
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_document_start(&self, total_pages: usize) {
        self.activate_bar(total_pages, "Reading");
    }

    fn on_page_complete(&self, page_num: usize, total: usize, pass: PassKind, chars: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {:<10}  {}",
            green("✓"),
            page_num,
            total,
            dim(&pass.to_string()),
            dim(&format!("{chars:>5} chars")),
        ));
        self.bar.inc(1);
    }

    fn on_ocr_fallback(&self, extracted_chars: usize, threshold: usize) {
        self.bar.println(format!(
            "  {} Text layer too short ({extracted_chars} < {threshold} chars), running OCR",
            yellow("⚠")
        ));
        let total = self.bar.length().unwrap_or(0) as usize;
        self.activate_bar(total, "OCR");
    }

    fn on_mrz_detected(&self, page_num: Option<usize>) {
        let at = page_num.map(|p| format!(" on page {p}")).unwrap_or_default();
        self.bar
            .println(format!("  {} MRZ detected{at}", cyan("◆")));
    }

    fn on_document_complete(&self, used_ocr: bool, chars: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} chars extracted{}",
            green("✔"),
            bold(&chars.to_string()),
            if used_ocr { " (OCR)" } else { "" }
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Passport scan (PDF or image), MRZ appended
  docfuse passport.jpg --kind passport

  # Fillable form, two-column layout, with MRZ
  docfuse g28.pdf --kind form --include-mrz

  # Generic PDF, JSON output written to a file
  docfuse report.pdf --json -o report.json

  # Keep an artifact of every result
  docfuse passport.pdf --kind passport --log-dir LOG

OUTPUT:
  Plain mode prints `used_ocr=<true|false>` on the first line followed by
  the reconciled text. MRZ data, when found, is appended as `[MRZ]` and
  `[MRZ PARSED]` sections.

ENVIRONMENT VARIABLES:
  DOCFUSE_*               Every flag has a DOCFUSE_<FLAG> fallback
  RUST_LOG                Override the log filter (e.g. docfuse=debug)
  PDFIUM_LIB_PATH         Path to an existing libpdfium (skips auto-download)
  PDFIUM_AUTO_CACHE_DIR   Override the default pdfium cache directory
  XDG_CACHE_HOME          OCR models are looked up in $XDG_CACHE_HOME/ocrs

SETUP:
  PDFium is downloaded automatically on first run and cached.
  OCR models (text-detection.rten, text-recognition.rten) are read from
  ~/.cache/ocrs or --ocr-models; `ocrs-cli` downloads them there.
"#;

/// Reconcile the text of PDFs, fillable forms and passport scans.
#[derive(Parser, Debug)]
#[command(
    name = "docfuse",
    version,
    about = "Extract reconciled text from PDFs, fillable forms and passport scans",
    long_about = "Extract text from PDFs, fillable forms and passport scans. The embedded \
text layer and form-field values are read first; documents with too little text are re-read \
through OCR. Machine-readable zones are located and appended as separate sections.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Document to read: a PDF, or an image for --kind passport.
    input: PathBuf,

    /// Document type: form, passport or pdf.
    #[arg(long, env = "DOCFUSE_KIND", value_enum, default_value = "pdf")]
    kind: KindArg,

    /// Reading order for --kind pdf.
    #[arg(long, env = "DOCFUSE_LAYOUT", value_enum, default_value = "single")]
    layout: LayoutArg,

    /// Append MRZ sections for --kind form / pdf.
    #[arg(long, env = "DOCFUSE_INCLUDE_MRZ")]
    include_mrz: bool,

    /// Skip MRZ detection for --kind passport.
    #[arg(long, env = "DOCFUSE_NO_MRZ", conflicts_with = "include_mrz")]
    no_mrz: bool,

    /// Minimum text-layer length before falling back to OCR.
    #[arg(long, env = "DOCFUSE_MIN_TEXT_LENGTH", default_value_t = 200)]
    min_text_length: usize,

    /// OCR rasterisation DPI (72–600).
    #[arg(long, env = "DOCFUSE_OCR_DPI", default_value_t = 200,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    ocr_dpi: u32,

    /// MRZ rasterisation DPI (72–600).
    #[arg(long, env = "DOCFUSE_MRZ_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    mrz_dpi: u32,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "DOCFUSE_PASSWORD")]
    password: Option<String>,

    /// Directory holding text-detection.rten and text-recognition.rten.
    #[arg(long, env = "DOCFUSE_OCR_MODELS")]
    ocr_models: Option<PathBuf>,

    /// Output the result as JSON instead of plain text.
    #[arg(long, env = "DOCFUSE_JSON")]
    json: bool,

    /// Write the result to this file instead of stdout.
    #[arg(short, long, env = "DOCFUSE_OUTPUT")]
    output: Option<PathBuf>,

    /// Also save each result as a timestamped JSON artifact in this directory.
    #[arg(long, env = "DOCFUSE_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Disable progress bar.
    #[arg(long, env = "DOCFUSE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCFUSE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOCFUSE_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum KindArg {
    Form,
    Passport,
    Pdf,
}

impl KindArg {
    fn as_str(self) -> &'static str {
        match self {
            KindArg::Form => "form",
            KindArg::Passport => "passport",
            KindArg::Pdf => "pdf",
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LayoutArg {
    Single,
    TwoColumn,
}

impl From<LayoutArg> for LayoutMode {
    fn from(v: LayoutArg) -> Self {
        match v {
            LayoutArg::Single => LayoutMode::SingleColumn,
            LayoutArg::TwoColumn => LayoutMode::TwoColumn,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO-level library logs are hidden while the progress bar is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    ensure_pdfium(&cli)?;

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run extraction ───────────────────────────────────────────────────
    let result = match cli.kind {
        KindArg::Form => extract_form_async(&cli.input, cli.include_mrz, &config).await,
        KindArg::Passport => extract_passport_async(&cli.input, &config).await,
        KindArg::Pdf => {
            extract_pdf_async(&cli.input, cli.layout.into(), cli.include_mrz, &config).await
        }
    }
    .with_context(|| format!("Extraction failed for {}", cli.input.display()))?;

    if let Some(ref dir) = cli.log_dir {
        ArtifactLog::new(dir).save_json(cli.kind.as_str(), &result);
    }

    let rendered = if cli.json {
        serde_json::to_string_pretty(&result).context("Failed to serialise result")?
    } else {
        format!("used_ocr={}\n{}", result.used_ocr, result.text)
    };

    if let Some(ref output_path) = cli.output {
        std::fs::write(output_path, &rendered)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        if !cli.quiet {
            eprintln!("{}  →  {}", green("✔"), bold(&output_path.display().to_string()));
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout")?;
        if !rendered.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    Ok(())
}

/// Make sure a pdfium library is available before the first document opens.
///
/// With `--features bundled` the library embedded at compile time is
/// extracted. Otherwise the first run downloads it once into the cache.
fn ensure_pdfium(cli: &Cli) -> Result<()> {
    #[cfg(feature = "bundled")]
    {
        let _ = cli;
        tokio::task::block_in_place(pdfium_auto::ensure_pdfium_bundled)
            .context("Failed to extract bundled PDFium engine")?;
    }

    #[cfg(not(feature = "bundled"))]
    if !pdfium_auto::is_pdfium_cached() {
        if cli.quiet {
            tokio::task::block_in_place(|| pdfium_auto::ensure_pdfium_library(None))
                .context("Failed to download PDFium engine")?;
        } else {
            let dl_bar = ProgressBar::new(0);
            dl_bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.cyan} {prefix:.bold}  \
                     [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  ")
                .tick_strings(TICKS),
            );
            dl_bar.set_prefix("PDF engine");
            dl_bar.enable_steady_tick(Duration::from_millis(80));

            let bar = dl_bar.clone();
            tokio::task::block_in_place(|| {
                pdfium_auto::ensure_pdfium_library(Some(&|downloaded, total| {
                    if let Some(t) = total {
                        if bar.length().unwrap_or(0) != t {
                            bar.set_length(t);
                        }
                    }
                    bar.set_position(downloaded);
                }))
            })
            .context("Failed to download PDFium engine")?;

            dl_bar.finish_with_message("ready ✓");
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .min_text_length(cli.min_text_length)
        .ocr_dpi(cli.ocr_dpi)
        .mrz_dpi(cli.mrz_dpi);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(ref dir) = cli.ocr_models {
        builder = builder.ocr_model_dir(dir.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    let wants_mrz = match cli.kind {
        KindArg::Passport => !cli.no_mrz,
        KindArg::Form | KindArg::Pdf => cli.include_mrz,
    };
    if wants_mrz {
        builder = with_mrz_reader(builder, cli);
    }

    builder.build().context("Invalid configuration")
}

/// The MRZ reader shares the OCR engine, so models are loaded up front.
/// Missing models only disable MRZ detection here; OCR itself still fails
/// later if a document actually needs it.
#[cfg(feature = "ocr")]
fn with_mrz_reader(
    builder: docfuse::ExtractionConfigBuilder,
    cli: &Cli,
) -> docfuse::ExtractionConfigBuilder {
    let loaded = tokio::task::block_in_place(|| {
        docfuse::OcrsEngine::from_model_dir(cli.ocr_models.as_deref())
    });
    match loaded {
        Ok(engine) => {
            let engine: Arc<dyn docfuse::OcrEngine> = Arc::new(engine);
            builder
                .ocr_engine(Arc::clone(&engine))
                .mrz_reader(Arc::new(docfuse::OcrMrzReader::new(engine)))
        }
        Err(e) => {
            tracing::warn!("MRZ detection disabled: {e}");
            builder
        }
    }
}

#[cfg(not(feature = "ocr"))]
fn with_mrz_reader(
    builder: docfuse::ExtractionConfigBuilder,
    _cli: &Cli,
) -> docfuse::ExtractionConfigBuilder {
    tracing::warn!("MRZ detection disabled: built without the `ocr` feature");
    builder
}
