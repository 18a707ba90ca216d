//! Result types returned by the conversion entry points.

use serde::{Deserialize, Serialize};

/// Result of a full notebook conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The assembled LaTeX source.
    pub latex: String,

    /// Conversion statistics.
    pub stats: ConversionStats,
}

/// Statistics for a conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Cells in the notebook, of any kind.
    pub total_cells: usize,

    /// Markdown cells converted.
    pub markdown_cells: usize,

    /// Code cells converted.
    pub code_cells: usize,

    /// Raw/unknown cells that produced no fragment.
    pub skipped_cells: usize,

    /// Outputs encountered across all code cells.
    pub total_outputs: usize,

    /// Outputs that produced a fragment (listing or figure).
    pub rendered_outputs: usize,

    /// Outputs of an unsupported kind, or bundles with no renderable
    /// payload; each left a blank-line placeholder.
    pub skipped_outputs: usize,

    /// Figures written to the graphics directory.
    pub figures_rendered: usize,

    /// Figures replaced by a placeholder comment
    /// ([`crate::RenderFailurePolicy::Placeholder`] only).
    pub figures_skipped: usize,

    /// Wall-clock time for the whole conversion.
    pub total_duration_ms: u64,

    /// Wall-clock time spent inside the rasteriser.
    pub raster_duration_ms: u64,
}

/// Shape of a notebook, reported by [`crate::inspect`] without converting
/// anything or touching the rasteriser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotebookSummary {
    /// Cells in the notebook, of any kind.
    pub cells: usize,

    /// Markdown cells.
    pub markdown_cells: usize,

    /// Code cells.
    pub code_cells: usize,

    /// Raw cells.
    pub raw_cells: usize,

    /// Code cells with a recorded execution count.
    pub executed_cells: usize,

    /// Outputs across all code cells.
    pub outputs: usize,

    /// Outputs carrying a `text/html` payload — the number of figures a
    /// conversion of this notebook would rasterise.
    pub html_outputs: usize,

    /// Kernel name from `metadata.kernelspec`, when declared.
    pub kernel: Option<String>,

    /// Language name from `metadata.language_info`, when declared.
    pub language: Option<String>,

    /// Major nbformat version, when declared.
    pub nbformat: Option<u32>,
}
