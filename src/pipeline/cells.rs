//! Cell conversion: map one notebook cell to LaTeX fragments.
//!
//! Markdown cells become sectioning commands or pass-through prose; code
//! cells become a verbatim listing, preceded by a `Code` heading when they
//! start a new run of code, followed by one fragment per output.

use crate::error::NbTexError;
use crate::latex;
use crate::notebook::Cell;
use crate::pipeline::{outputs, ConversionSession};
use tracing::{debug, warn};

/// Convert one cell, appending its fragments to the session.
pub fn convert_cell(session: &mut ConversionSession<'_>, cell: &Cell) -> Result<(), NbTexError> {
    match cell {
        Cell::Markdown { source } => {
            let fragment = convert_markdown(&source.concat());
            session.push(Some(fragment));
            session.last_cell_was_code = false;
            session.stats.markdown_cells += 1;
        }

        Cell::Code {
            source, outputs, ..
        } => {
            // One `Code` heading per run of consecutive code cells.
            if !session.last_cell_was_code {
                session.push(Some(latex::code_heading()));
            }
            let listing = latex::code_listing(&source.concat(), &session.language);
            session.push(Some(listing));
            session.last_cell_was_code = true;
            session.stats.code_cells += 1;

            for output in outputs {
                let fragment = outputs::render_output(session, output)?;
                session.push(fragment);
            }
        }

        // Raw cells target a specific output format that is not LaTeX from
        // this converter's point of view. They produce nothing and leave
        // the code-run flag untouched.
        Cell::Raw { .. } => {
            debug!("Skipping raw cell");
            session.stats.skipped_cells += 1;
        }

        Cell::Unknown => {
            warn!("Skipping cell of unrecognised kind");
            session.stats.skipped_cells += 1;
        }
    }

    Ok(())
}

/// Convert concatenated markdown source to its fragment.
///
/// `##` is tested before `#`: the historic converter checked the branches
/// in the opposite order, so every level-2 heading was misfiled as a
/// section. Heading depth beyond two collapses to a subsection either way.
fn convert_markdown(text: &str) -> String {
    if text.starts_with("##") {
        latex::subsection(&latex::heading_text(text))
    } else if text.starts_with('#') {
        latex::section(&latex::heading_text(text))
    } else {
        latex::prose(text)
    }
}
