//! Asset generation: rasterise HTML outputs into numbered figure files.
//!
//! ## Why a subprocess?
//!
//! Faithfully rendering arbitrary HTML (tables styled by pandas, plotly
//! snippets) needs a real layout engine. `wkhtmltoimage` ships one behind a
//! one-shot command-line interface, which keeps this crate free of browser
//! bindings: we hand it an `.html` file and a target path and block until
//! it exits. The [`HtmlRasterizer`] trait is the seam in front of that
//! subprocess — tests and embedders substitute their own engine without the
//! pipeline knowing.
//!
//! ## Why a temp file instead of stdin?
//!
//! `wkhtmltoimage` sniffs the input format from the file extension and
//! resolves relative resources against the input's directory. A managed
//! [`tempfile`] with an `.html` suffix gets both right and is cleaned up
//! automatically when the handle drops, even on error paths.

use crate::error::NbTexError;
use crate::latex;
use crate::pipeline::ConversionSession;
use std::io::Write as _;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// The rasteriser used when the configuration names no other.
pub const DEFAULT_RASTERIZER_COMMAND: &str = "wkhtmltoimage";

/// External HTML-to-image engine.
///
/// Implementations write an image file at `output_path` for the given HTML
/// string, blocking until the file exists or the attempt has failed. The
/// engine's own format support and failure taxonomy are opaque to nbtex.
pub trait HtmlRasterizer: Send + Sync {
    fn rasterize(&self, html: &str, output_path: &Path) -> Result<(), RasterizeFailure>;
}

/// Failure reported by a rasteriser implementation.
#[derive(Debug)]
pub enum RasterizeFailure {
    /// The engine could not be launched at all (missing binary, bad
    /// permissions). Always fatal: every subsequent figure would fail the
    /// same way.
    Unavailable { command: String, detail: String },

    /// The engine ran but did not produce the image.
    Failed { detail: String },
}

/// Default rasteriser: shells out to `wkhtmltoimage`.
pub struct WkhtmltoimageRasterizer {
    command: String,
}

impl WkhtmltoimageRasterizer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for WkhtmltoimageRasterizer {
    fn default() -> Self {
        Self::new(DEFAULT_RASTERIZER_COMMAND)
    }
}

impl HtmlRasterizer for WkhtmltoimageRasterizer {
    fn rasterize(&self, html: &str, output_path: &Path) -> Result<(), RasterizeFailure> {
        let mut input = tempfile::Builder::new()
            .prefix("nbtex-")
            .suffix(".html")
            .tempfile()
            .map_err(|e| RasterizeFailure::Failed {
                detail: format!("could not create temp HTML file: {e}"),
            })?;
        input
            .write_all(html.as_bytes())
            .map_err(|e| RasterizeFailure::Failed {
                detail: format!("could not write temp HTML file: {e}"),
            })?;

        debug!(
            "Invoking {} for {}",
            self.command,
            output_path.display()
        );

        let result = Command::new(&self.command)
            .arg("--quiet")
            .arg(input.path())
            .arg(output_path)
            .output()
            .map_err(|e| RasterizeFailure::Unavailable {
                command: self.command.clone(),
                detail: e.to_string(),
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(RasterizeFailure::Failed {
                detail: format!("{} ({})", result.status, stderr.trim()),
            });
        }

        Ok(())
    }
}

/// Resolve the rasteriser: a pre-built instance from the config, else the
/// subprocess default with the configured or built-in command name.
pub fn resolve_rasterizer(config: &crate::config::ConversionConfig) -> Arc<dyn HtmlRasterizer> {
    if let Some(ref rasterizer) = config.rasterizer {
        return Arc::clone(rasterizer);
    }
    let command = config
        .rasterizer_command
        .as_deref()
        .unwrap_or(DEFAULT_RASTERIZER_COMMAND);
    Arc::new(WkhtmltoimageRasterizer::new(command))
}

/// Materialise one HTML payload as `figure_<N>.jpg` and return the figure
/// fragment referencing it.
///
/// Claims the next figure number first: the counter tracks HTML payloads
/// *encountered*, so under the placeholder policy a failed figure still
/// consumes its number and the survivors keep their encounter-order names.
pub fn render_figure(
    session: &mut ConversionSession<'_>,
    html: &str,
) -> Result<String, NbTexError> {
    let figure_nr = session.next_figure();
    let graphics_dir = session.config.graphics_dir.clone();

    std::fs::create_dir_all(&graphics_dir).map_err(|source| NbTexError::GraphicsDirFailed {
        path: graphics_dir.clone(),
        source,
    })?;

    let image_path = graphics_dir.join(format!("figure_{figure_nr}.jpg"));
    let started = Instant::now();
    let outcome = session.rasterizer.rasterize(html, &image_path);
    session.raster_time += started.elapsed();

    match outcome {
        Ok(()) => {
            debug!("Rendered figure {} → {}", figure_nr, image_path.display());
            session.stats.figures_rendered += 1;
            if let Some(ref cb) = session.config.progress_callback {
                cb.on_figure_rendered(figure_nr);
            }
            Ok(latex::figure(
                &graphics_dir.display().to_string(),
                figure_nr,
                session.config.figure_width_cm,
            ))
        }
        Err(RasterizeFailure::Unavailable { command, detail }) => {
            if let Some(ref cb) = session.config.progress_callback {
                cb.on_figure_error(figure_nr, &detail);
            }
            Err(NbTexError::RasterizerUnavailable { command, detail })
        }
        Err(RasterizeFailure::Failed { detail }) => {
            if let Some(ref cb) = session.config.progress_callback {
                cb.on_figure_error(figure_nr, &detail);
            }
            match session.config.on_render_failure {
                crate::config::RenderFailurePolicy::Abort => {
                    Err(NbTexError::RasterizationFailed {
                        figure: figure_nr,
                        detail,
                    })
                }
                crate::config::RenderFailurePolicy::Placeholder => {
                    warn!("Skipping figure {}: {}", figure_nr, detail);
                    session.stats.figures_skipped += 1;
                    Ok(latex::figure_placeholder(
                        figure_nr,
                        "HTML rasterisation failed",
                    ))
                }
            }
        }
    }
}
