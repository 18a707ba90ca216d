//! Progress-callback trait for per-cell conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline walks the notebook. Cell conversion itself is
//! effectively instant; the events that matter are the per-figure ones,
//! because each rasteriser invocation is a full subprocess round-trip that
//! can take a second or more.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a terminal progress bar, a log, or a GUI without
//! the library knowing anything about how the host application communicates.
//! The trait is `Send + Sync` so one callback can be shared between a
//! conversion thread and a UI thread, even though the pipeline itself is
//! strictly single-threaded.

use std::sync::Arc;

/// Called by the conversion pipeline as it processes each cell and figure.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive in document order from the single
/// conversion thread.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before any cell is converted.
    ///
    /// # Arguments
    /// * `total_cells` — number of cells in the notebook
    fn on_conversion_start(&self, total_cells: usize) {
        let _ = total_cells;
    }

    /// Called just before a cell is converted.
    ///
    /// # Arguments
    /// * `cell_num`    — 1-indexed cell number
    /// * `total_cells` — total cells in the notebook
    fn on_cell_start(&self, cell_num: usize, total_cells: usize) {
        let _ = (cell_num, total_cells);
    }

    /// Called when a cell's fragments have all been emitted.
    ///
    /// # Arguments
    /// * `cell_num`    — 1-indexed cell number
    /// * `total_cells` — total cells
    /// * `fragments`   — number of fragments the cell produced
    fn on_cell_complete(&self, cell_num: usize, total_cells: usize, fragments: usize) {
        let _ = (cell_num, total_cells, fragments);
    }

    /// Called after the rasteriser has written `figure_<figure_nr>.jpg`.
    ///
    /// # Arguments
    /// * `figure_nr` — 0-indexed figure number (matches file name and label)
    fn on_figure_rendered(&self, figure_nr: usize) {
        let _ = figure_nr;
    }

    /// Called when a figure could not be rasterised.
    ///
    /// Under [`crate::RenderFailurePolicy::Abort`] this is the last event
    /// before the conversion returns an error; under `Placeholder` the
    /// conversion continues.
    ///
    /// # Arguments
    /// * `figure_nr` — 0-indexed figure number
    /// * `error`     — human-readable failure description
    fn on_figure_error(&self, figure_nr: usize, error: &str) {
        let _ = (figure_nr, error);
    }

    /// Called once after the last cell.
    ///
    /// # Arguments
    /// * `total_cells`      — total cells in the notebook
    /// * `figures_rendered` — figures successfully written
    fn on_conversion_complete(&self, total_cells: usize, figures_rendered: usize) {
        let _ = (total_cells, figures_rendered);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
