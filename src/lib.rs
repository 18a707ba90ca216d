//! # nbtex
//!
//! Convert Jupyter notebooks (`.ipynb`) to LaTeX source, rasterising HTML
//! outputs into figures.
//!
//! ## Why this crate?
//!
//! Exporters that translate notebook HTML outputs into LaTeX markup lose
//! exactly the outputs people care about — styled pandas tables, widget
//! snapshots — because rich HTML has no faithful LaTeX equivalent. Instead
//! this crate hands each HTML output to a real layout engine
//! (`wkhtmltoimage`), embeds the resulting JPEG as a numbered figure, and
//! typesets everything else (markdown headings, code, printed output) as
//! native LaTeX.
//!
//! ## Pipeline Overview
//!
//! ```text
//! notebook.ipynb
//!  │
//!  ├─ 1. Input    validate path, deserialize the cell/output model
//!  ├─ 2. Cells    markdown → sectioning/prose, code → lstlisting
//!  ├─ 3. Outputs  stream/result/display → listing, figure, or nothing
//!  ├─ 4. Assets   HTML payloads → graphics/figure_N.jpg via wkhtmltoimage
//!  └─ 5. Output   head + title + fragments + foot → document.tex
//! ```
//!
//! One synchronous pass, in source order; figure numbers follow encounter
//! order and start at 0.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nbtex::{convert_to_file, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert_to_file(
//!         "analysis.ipynb",
//!         "analysis.tex",
//!         "Quarterly Analysis",
//!         "Jane Doe",
//!         &config,
//!     )?;
//!     eprintln!(
//!         "{} cells, {} figures",
//!         output.stats.total_cells, output.stats.figures_rendered
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `nbtex` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! nbtex = { version = "0.2", default-features = false }
//! ```
//!
//! ## External requirement
//!
//! The default rasteriser shells out to `wkhtmltoimage`
//! (<https://wkhtmltopdf.org>). Swap it via
//! [`ConversionConfigBuilder::rasterizer_command`] or implement
//! [`HtmlRasterizer`] yourself — notebooks without HTML outputs never
//! invoke it at all.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod boilerplate;
pub mod config;
pub mod convert;
pub mod error;
pub mod latex;
pub mod notebook;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, RenderFailurePolicy};
pub use convert::{convert, convert_to_file, inspect};
pub use error::NbTexError;
pub use notebook::{Cell, MimeBundle, MultilineText, Notebook, NotebookMetadata, Output};
pub use output::{ConversionOutput, ConversionStats, NotebookSummary};
pub use pipeline::assets::{
    HtmlRasterizer, RasterizeFailure, WkhtmltoimageRasterizer, DEFAULT_RASTERIZER_COMMAND,
};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
