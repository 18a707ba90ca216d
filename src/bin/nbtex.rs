//! CLI binary for nbtex.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use nbtex::{
    convert_to_file, inspect, ConversionConfig, ConversionProgressCallback, ProgressCallback,
    RenderFailurePolicy,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a cell-count progress bar plus a log line per
/// rasterised figure. Figures are the slow part — each one is a full
/// `wkhtmltoimage` round-trip — so they get their own lines while cells
/// drive the bar.
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically
    /// by `on_conversion_start` (called before any cell is converted).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_conversion_start

        // Initial style: spinner only (no counter until we know the total).
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening notebook…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} cells  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_cells: usize) {
        self.activate_bar(total_cells);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_cells} cells…"))
        ));
    }

    fn on_cell_start(&self, cell_num: usize, _total: usize) {
        self.bar.set_message(format!("cell {cell_num}"));
    }

    fn on_cell_complete(&self, _cell_num: usize, _total: usize, _fragments: usize) {
        self.bar.inc(1);
    }

    fn on_figure_rendered(&self, figure_nr: usize) {
        self.bar.println(format!(
            "  {} figure_{}.jpg",
            green("✓"),
            figure_nr
        ));
    }

    fn on_figure_error(&self, figure_nr: usize, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = if error.len() > 80 {
            format!("{}\u{2026}", &error[..79])
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} figure_{}  {}",
            red("✗"),
            figure_nr,
            red(&msg)
        ));
    }

    fn on_conversion_complete(&self, total_cells: usize, figures_rendered: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} cells converted, {} figures rendered",
            green("✔"),
            bold(&total_cells.to_string()),
            bold(&figures_rendered.to_string()),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion
  nbtex analysis.ipynb -o analysis.tex --title "Quarterly Analysis" --author "Jane Doe"

  # Figures in a custom directory, narrower figure width
  nbtex report.ipynb -o report.tex --title Report --author Me \
        --graphics-dir figures --figure-width 12

  # Keep going when a figure fails to rasterise
  nbtex flaky.ipynb -o flaky.tex --title T --author A --on-render-failure placeholder

  # Force a listings language (default: notebook metadata, else Python)
  nbtex r_analysis.ipynb -o out.tex --title T --author A --language R

  # Inspect the notebook shape (no rasteriser needed)
  nbtex --inspect-only analysis.ipynb

  # Machine-readable stats
  nbtex analysis.ipynb -o out.tex --title T --author A --json

OUTPUT LAYOUT:
  <output.tex>                 assembled LaTeX document (overwritten)
  <graphics-dir>/figure_N.jpg  one per HTML output, N from 0 in document order

ENVIRONMENT VARIABLES:
  NBTEX_TITLE        Document title (same as --title)
  NBTEX_AUTHOR       Author line (same as --author)
  NBTEX_GRAPHICS_DIR Figure output directory (same as --graphics-dir)
  NBTEX_RASTERIZER   HTML rasteriser command (same as --rasterizer)

SETUP:
  1. Install wkhtmltoimage:  https://wkhtmltopdf.org  (only needed for
     notebooks with HTML outputs)
  2. Convert:                nbtex notebook.ipynb -o out.tex --title T --author A
  3. Typeset:                pdflatex out.tex
"#;

/// Convert Jupyter notebooks to LaTeX, rasterising HTML outputs into figures.
#[derive(Parser, Debug)]
#[command(
    name = "nbtex",
    version,
    about = "Convert Jupyter notebooks to LaTeX, rasterising HTML outputs into figures",
    long_about = "Convert a Jupyter notebook (.ipynb) to a LaTeX source file. Markdown cells \
become sections and prose, code cells become listings, and HTML outputs (pandas tables, \
rich reprs) are rasterised to JPEG figures via wkhtmltoimage.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the notebook (.ipynb) file.
    input: PathBuf,

    /// Write the LaTeX document to this file (overwritten).
    #[arg(short, long, env = "NBTEX_OUTPUT", required_unless_present = "inspect_only")]
    output: Option<PathBuf>,

    /// Document title, inserted into \title{…}.
    #[arg(long, env = "NBTEX_TITLE", required_unless_present = "inspect_only")]
    title: Option<String>,

    /// Author line, inserted into \author{…}.
    #[arg(long, env = "NBTEX_AUTHOR", required_unless_present = "inspect_only")]
    author: Option<String>,

    /// Directory that receives figure_<N>.jpg files.
    #[arg(long, env = "NBTEX_GRAPHICS_DIR", default_value = "graphics")]
    graphics_dir: PathBuf,

    /// Figure display width in centimetres.
    #[arg(long, env = "NBTEX_FIGURE_WIDTH", default_value_t = 18.5)]
    figure_width: f32,

    /// listings language for code cells (default: notebook metadata, else Python).
    #[arg(long, env = "NBTEX_LANGUAGE")]
    language: Option<String>,

    /// What to do when a figure fails to rasterise.
    #[arg(long, env = "NBTEX_ON_RENDER_FAILURE", value_enum, default_value = "abort")]
    on_render_failure: FailureArg,

    /// HTML rasteriser command (invoked as: <cmd> --quiet in.html out.jpg).
    #[arg(long, env = "NBTEX_RASTERIZER")]
    rasterizer: Option<String>,

    /// Print the notebook's shape (cell/output counts), no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Output machine-readable JSON (stats, or the summary with --inspect-only).
    #[arg(long, env = "NBTEX_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "NBTEX_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "NBTEX_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "NBTEX_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum FailureArg {
    Abort,
    Placeholder,
}

impl From<FailureArg> for RenderFailurePolicy {
    fn from(v: FailureArg) -> Self {
        match v {
            FailureArg::Abort => RenderFailurePolicy::Abort,
            FailureArg::Placeholder => RenderFailurePolicy::Placeholder,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
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

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let summary = inspect(&cli.input).context("Failed to inspect notebook")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
            );
        } else {
            println!("File:            {}", cli.input.display());
            println!("Cells:           {}", summary.cells);
            println!("  markdown:      {}", summary.markdown_cells);
            println!("  code:          {}", summary.code_cells);
            println!("  raw:           {}", summary.raw_cells);
            println!("  executed:      {}", summary.executed_cells);
            println!("Outputs:         {}", summary.outputs);
            println!("  HTML (figures):{}", summary.html_outputs);
            if let Some(ref k) = summary.kernel {
                println!("Kernel:          {}", k);
            }
            if let Some(ref l) = summary.language {
                println!("Language:        {}", l);
            }
            if let Some(v) = summary.nbformat {
                println!("nbformat:        {}", v);
            }
        }
        return Ok(());
    }

    // `required_unless_present` guarantees these in conversion mode.
    let output_path = cli.output.clone().context("--output is required")?;
    let title = cli.title.clone().context("--title is required")?;
    let author = cli.author.clone().context("--author is required")?;

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let output = convert_to_file(&cli.input, &output_path, &title, &author, &config)
        .context("Conversion failed")?;

    if cli.json {
        let json =
            serde_json::to_string_pretty(&output.stats).context("Failed to serialise stats")?;
        println!("{json}");
    } else if !cli.quiet {
        // Summary line (the callback already printed the per-figure log).
        let stats = &output.stats;
        eprintln!(
            "{}  {} cells  {} figures  {}ms  →  {}",
            if stats.figures_skipped == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.total_cells,
            stats.figures_rendered,
            stats.total_duration_ms,
            bold(&output_path.display().to_string()),
        );
        if stats.figures_skipped > 0 {
            eprintln!(
                "   {} figures replaced by placeholders",
                red(&stats.figures_skipped.to_string())
            );
        }
        if stats.skipped_outputs > 0 {
            eprintln!(
                "   {}",
                dim(&format!(
                    "{} outputs had no renderable payload",
                    stats.skipped_outputs
                ))
            );
        }
        io::stderr().flush().ok();
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .graphics_dir(&cli.graphics_dir)
        .figure_width_cm(cli.figure_width)
        .on_render_failure(cli.on_render_failure.clone().into());

    if let Some(ref language) = cli.language {
        builder = builder.listing_language(language.as_str());
    }
    if let Some(ref command) = cli.rasterizer {
        builder = builder.rasterizer_command(command.as_str());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
