//! Error types for the nbtex library.
//!
//! A single [`NbTexError`] enum covers every fatal failure mode. The
//! conversion is a fail-fast batch tool: parse errors and (under the default
//! policy) rasterisation errors abort the run immediately, with no retry and
//! no cleanup of partially written image files. The one non-fatal case —
//! an output kind the converter does not recognise — never becomes an error
//! at all; it is logged at WARN and counted in
//! [`crate::output::ConversionStats::skipped_outputs`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the nbtex library.
#[derive(Debug, Error)]
pub enum NbTexError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Notebook file not found: '{path}'\nCheck the path exists and is readable.")]
    NotebookNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not notebook JSON.
    #[error("File is not a valid notebook: '{path}'\n{detail}")]
    MalformedNotebook { path: PathBuf, detail: String },

    // ── Asset errors ──────────────────────────────────────────────────────
    /// The rasteriser binary could not be spawned at all.
    #[error(
        "HTML rasteriser '{command}' could not be run: {detail}\n\
         nbtex shells out to wkhtmltoimage to turn HTML outputs into figures.\n\
         Install it (https://wkhtmltopdf.org) or point --rasterizer at another\n\
         command that accepts: <command> <input.html> <output.jpg>"
    )]
    RasterizerUnavailable { command: String, detail: String },

    /// The rasteriser ran but reported failure for one figure.
    #[error("Rasterisation failed for figure {figure}: {detail}")]
    RasterizationFailed { figure: usize, detail: String },

    /// The graphics directory could not be created.
    #[error("Failed to create graphics directory '{path}': {source}")]
    GraphicsDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not write the output LaTeX file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
