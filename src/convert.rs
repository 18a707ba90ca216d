//! Conversion entry points and document assembly.
//!
//! [`convert`] is the primary API: one synchronous pass over the notebook,
//! in source order, producing the full LaTeX document in memory.
//! [`convert_to_file`] adds the file write; [`inspect`] reports the
//! notebook's shape without converting anything (and without needing a
//! rasteriser on the machine).
//!
//! ## Why synchronous?
//!
//! The pipeline has exactly one slow collaborator — the rasteriser
//! subprocess — and figure numbering requires outputs to be visited in
//! document order anyway. Blocking on each subprocess in turn is the whole
//! scheduling story; there is nothing for an async runtime to overlap.

use crate::boilerplate;
use crate::config::ConversionConfig;
use crate::error::NbTexError;
use crate::latex;
use crate::notebook::{Cell, Notebook, Output};
use crate::output::{ConversionOutput, NotebookSummary};
use crate::pipeline::{assets, cells, input, ConversionSession};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Listing language used when neither the config nor the notebook names one.
const FALLBACK_LANGUAGE: &str = "Python";

/// Convert a notebook file to a LaTeX document.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_path` — path to the `.ipynb` file
/// * `title`      — document title (LaTeX-escaped before insertion)
/// * `author`     — author line (LaTeX-escaped before insertion)
/// * `config`     — conversion configuration
///
/// # Errors
/// Fatal errors only — a malformed notebook, or (under the default
/// [`crate::RenderFailurePolicy::Abort`]) a failed figure rasterisation.
/// Outputs of unsupported kinds never fail; they are counted in
/// `stats.skipped_outputs`.
pub fn convert(
    input_path: impl AsRef<Path>,
    title: &str,
    author: &str,
    config: &ConversionConfig,
) -> Result<ConversionOutput, NbTexError> {
    let total_start = Instant::now();
    let input_path = input_path.as_ref();
    info!("Starting conversion: {}", input_path.display());

    // ── Step 1: Load the notebook ────────────────────────────────────────
    let notebook = input::load_notebook(input_path)?;
    let total_cells = notebook.cells.len();

    // ── Step 2: Resolve collaborators ────────────────────────────────────
    let rasterizer = assets::resolve_rasterizer(config);
    let language = resolve_language(config, &notebook);
    debug!("Listing language: {}", language);

    // ── Step 3: Assemble ─────────────────────────────────────────────────
    let mut session = ConversionSession::new(config, rasterizer, language);

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total_cells);
    }

    session.push(Some(boilerplate::HEAD.to_string()));
    session.push(Some(boilerplate::title_block(title, author)));

    for (idx, cell) in notebook.cells.iter().enumerate() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_cell_start(idx + 1, total_cells);
        }
        let before = session.fragments.len();
        cells::convert_cell(&mut session, cell)?;
        if let Some(ref cb) = config.progress_callback {
            cb.on_cell_complete(idx + 1, total_cells, session.fragments.len() - before);
        }
    }

    session.push(Some(boilerplate::FOOT.to_string()));

    // ── Step 4: Finalise ─────────────────────────────────────────────────
    let mut stats = std::mem::take(&mut session.stats);
    stats.total_cells = total_cells;
    stats.raster_duration_ms = session.raster_time.as_millis() as u64;
    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(total_cells, stats.figures_rendered);
    }

    info!(
        "Conversion complete: {} cells, {} figures, {}ms",
        total_cells, stats.figures_rendered, stats.total_duration_ms
    );

    Ok(ConversionOutput {
        latex: session.into_latex(),
        stats,
    })
}

/// Convert a notebook and write the LaTeX source to `output_path`.
///
/// The destination is overwritten wholesale — no backup, no atomic rename.
/// A conversion that would reference a missing figure has already aborted
/// by the time anything is written, so a partial file can only be the
/// result of the write itself failing.
pub fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    title: &str,
    author: &str,
    config: &ConversionConfig,
) -> Result<ConversionOutput, NbTexError> {
    let output = convert(input_path, title, author, config)?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| NbTexError::OutputWriteFailed {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    std::fs::write(path, &output.latex).map_err(|source| NbTexError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Wrote {}", path.display());
    Ok(output)
}

/// Report a notebook's shape without converting it.
///
/// Does not require the rasteriser and writes nothing.
pub fn inspect(input_path: impl AsRef<Path>) -> Result<NotebookSummary, NbTexError> {
    let notebook = input::load_notebook(input_path.as_ref())?;

    let mut summary = NotebookSummary {
        cells: notebook.cells.len(),
        kernel: notebook
            .metadata
            .kernelspec
            .as_ref()
            .map(|k| k.name.clone()),
        language: notebook
            .metadata
            .language_info
            .as_ref()
            .map(|l| l.name.clone()),
        nbformat: notebook.nbformat,
        ..Default::default()
    };

    for cell in &notebook.cells {
        match cell {
            Cell::Markdown { .. } => summary.markdown_cells += 1,
            Cell::Code {
                outputs,
                execution_count,
                ..
            } => {
                summary.code_cells += 1;
                if execution_count.is_some() {
                    summary.executed_cells += 1;
                }
                summary.outputs += outputs.len();
                summary.html_outputs += outputs
                    .iter()
                    .filter(|o| match o {
                        Output::ExecuteResult { data } | Output::DisplayData { data } => {
                            data.has_html()
                        }
                        _ => false,
                    })
                    .count();
            }
            Cell::Raw { .. } => summary.raw_cells += 1,
            Cell::Unknown => {}
        }
    }

    Ok(summary)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Pick the `listings` language: explicit config override, else the
/// notebook's declared language, else the fallback.
fn resolve_language(config: &ConversionConfig, notebook: &Notebook) -> String {
    if let Some(ref language) = config.listing_language {
        return language.clone();
    }
    notebook
        .language()
        .map(latex::listings_language)
        .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string())
}
