//! Pipeline stages for notebook-to-LaTeX conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different rasteriser) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ cells ──▶ outputs ──▶ assets
//! (path)   (md/code)  (dispatch)  (wkhtmltoimage)
//! ```
//!
//! 1. [`input`]   — validate the path and deserialize the notebook JSON
//! 2. [`cells`]   — map one markdown or code cell to LaTeX fragments
//! 3. [`outputs`] — map one execution output to a fragment, or to `None`
//! 4. [`assets`]  — rasterise HTML payloads into numbered figure files
//!
//! All stages after [`input`] communicate through a [`ConversionSession`]:
//! the single-pass accumulator that replaces the ambient state the historic
//! tool kept on its converter object.

pub mod assets;
pub mod cells;
pub mod input;
pub mod outputs;

use crate::config::ConversionConfig;
use crate::output::ConversionStats;
use assets::HtmlRasterizer;
use std::sync::Arc;
use std::time::Duration;

/// Accumulator state for one conversion pass.
///
/// Owned by the assembler in [`crate::convert`] and threaded by `&mut`
/// through the cell and output stages. Never static, never shared: a fresh
/// session per conversion is what makes the assembler reusable and the
/// figure numbering deterministic.
pub struct ConversionSession<'a> {
    pub(crate) config: &'a ConversionConfig,

    /// The resolved rasteriser (configured instance or subprocess default).
    pub(crate) rasterizer: Arc<dyn HtmlRasterizer>,

    /// Resolved `listings` language for code cells.
    pub(crate) language: String,

    /// Ordered, append-only fragment list. `None` marks an output that
    /// produced nothing; it survives to the final join as a blank line.
    pub(crate) fragments: Vec<Option<String>>,

    /// Next figure number. The Nth HTML payload encountered gets file
    /// `figure_N.jpg` and label `figure N`, N starting at 0.
    pub(crate) figure_nr: usize,

    /// Whether the previous cell was a code cell. Drives the
    /// `\subsubsection{Code}` insertion rule.
    pub(crate) last_cell_was_code: bool,

    pub(crate) stats: ConversionStats,

    /// Time spent inside the rasteriser, for [`ConversionStats`].
    pub(crate) raster_time: Duration,
}

impl<'a> ConversionSession<'a> {
    pub(crate) fn new(
        config: &'a ConversionConfig,
        rasterizer: Arc<dyn HtmlRasterizer>,
        language: String,
    ) -> Self {
        Self {
            config,
            rasterizer,
            language,
            fragments: Vec::new(),
            figure_nr: 0,
            last_cell_was_code: false,
            stats: ConversionStats::default(),
            raster_time: Duration::ZERO,
        }
    }

    /// Append one fragment (or a `None` placeholder) to the document.
    pub(crate) fn push(&mut self, fragment: Option<String>) {
        self.fragments.push(fragment);
    }

    /// Claim the next figure number.
    pub(crate) fn next_figure(&mut self) -> usize {
        let n = self.figure_nr;
        self.figure_nr += 1;
        n
    }

    /// Join all fragments into the final document text. `None` fragments
    /// contribute an empty string, which the `\n` join turns into the
    /// blank-line placeholder the historic output format had.
    pub(crate) fn into_latex(self) -> String {
        self.fragments
            .into_iter()
            .map(|f| f.unwrap_or_default())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::assets::testing::FakeRasterizer;

    #[test]
    fn fragments_join_with_blank_line_placeholders() {
        let config = ConversionConfig::default();
        let mut session =
            ConversionSession::new(&config, Arc::new(FakeRasterizer::ok()), "Python".into());
        session.push(Some("a".into()));
        session.push(None);
        session.push(Some("b".into()));
        assert_eq!(session.into_latex(), "a\n\nb");
    }

    #[test]
    fn figure_numbers_are_sequential_from_zero() {
        let config = ConversionConfig::default();
        let mut session =
            ConversionSession::new(&config, Arc::new(FakeRasterizer::ok()), "Python".into());
        assert_eq!(session.next_figure(), 0);
        assert_eq!(session.next_figure(), 1);
        assert_eq!(session.next_figure(), 2);
    }
}
