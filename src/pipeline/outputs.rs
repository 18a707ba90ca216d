//! Output rendering: map one execution output to a LaTeX fragment.
//!
//! Dispatch is an exhaustive match over the closed [`Output`] enum. Three
//! kinds render; everything else — `error` outputs, kinds this converter
//! has never heard of, bundles with no usable payload — renders to `None`
//! and is counted, never raised. A notebook full of exotic outputs still
//! converts; it just converts to a sparser document.

use crate::error::NbTexError;
use crate::latex;
use crate::notebook::Output;
use crate::pipeline::{assets, ConversionSession};
use tracing::{debug, warn};

/// Render one output to a fragment, or to `None` when the kind or payload
/// is unsupported.
///
/// HTML payloads win over plain text: a rich `execute_result` (a pandas
/// table, say) carries both, and the rasterised figure is the point of this
/// tool. Plain text is only consulted for `execute_result`; a `display_data`
/// without HTML has nothing we render.
pub fn render_output(
    session: &mut ConversionSession<'_>,
    output: &Output,
) -> Result<Option<String>, NbTexError> {
    session.stats.total_outputs += 1;

    let fragment = match output {
        Output::Stream { text } => Some(latex::output_listing(&text.concat())),

        Output::ExecuteResult { data } => {
            if let Some(html) = data.html() {
                Some(assets::render_figure(session, &html)?)
            } else if let Some(plain) = data.plain_text() {
                Some(latex::output_listing(&plain))
            } else {
                debug!("execute_result with no renderable payload");
                None
            }
        }

        Output::DisplayData { data } => {
            if let Some(html) = data.html() {
                Some(assets::render_figure(session, &html)?)
            } else {
                debug!("display_data with no HTML payload");
                None
            }
        }

        Output::Error => {
            debug!("Skipping error output");
            None
        }

        Output::Unknown => {
            warn!("Skipping output of unrecognised kind");
            None
        }
    };

    match fragment {
        Some(_) => session.stats.rendered_outputs += 1,
        None => session.stats.skipped_outputs += 1,
    }

    Ok(fragment)
}
