//! Configuration types for notebook-to-LaTeX conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share a config between the CLI and library callers and to
//! diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! The historic tool took exactly four positional parameters and hardcoded
//! everything else. The builder keeps that spirit — callers set only what
//! they care about — while making the formerly hardcoded values (graphics
//! directory, figure width, listing language, failure policy) explicit,
//! documented defaults.

use crate::error::NbTexError;
use crate::pipeline::assets::HtmlRasterizer;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for a notebook-to-LaTeX conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use nbtex::{ConversionConfig, RenderFailurePolicy};
///
/// let config = ConversionConfig::builder()
///     .graphics_dir("figures")
///     .figure_width_cm(12.0)
///     .on_render_failure(RenderFailurePolicy::Placeholder)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Directory that receives `figure_<N>.jpg` files. Default: `graphics`.
    ///
    /// Relative paths are resolved against the process working directory,
    /// matching where LaTeX will later resolve `\includegraphics` from. The
    /// directory is created on demand.
    pub graphics_dir: PathBuf,

    /// Display width of embedded figures in centimetres. Default: 18.5.
    ///
    /// 18.5 cm fills the text block of the one-column IEEE journal layout
    /// the preamble selects. Narrower documents want a smaller value.
    pub figure_width_cm: f32,

    /// `listings` language tag for code cells. Default: None.
    ///
    /// When unset, the language is taken from the notebook's
    /// `language_info` metadata (mapped to the `listings` spelling), falling
    /// back to `Python` for metadata-less files.
    pub listing_language: Option<String>,

    /// What to do when the rasteriser fails on one figure. Default: Abort.
    ///
    /// `Abort` stops the whole conversion — a document referencing an image
    /// that was never written is worse than no document. `Placeholder`
    /// swaps the figure for a LaTeX comment and keeps going, which suits
    /// batch runs over many notebooks where one bad HTML table should not
    /// sink the rest.
    pub on_render_failure: RenderFailurePolicy,

    /// Pre-constructed rasteriser. Takes precedence over
    /// `rasterizer_command`. Used by tests and by callers embedding their
    /// own HTML engine.
    pub rasterizer: Option<Arc<dyn HtmlRasterizer>>,

    /// External rasteriser command name. Default: `wkhtmltoimage`.
    ///
    /// Invoked as `<command> --quiet <input.html> <output.jpg>`.
    pub rasterizer_command: Option<String>,

    /// Per-cell/per-figure progress events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            graphics_dir: PathBuf::from("graphics"),
            figure_width_cm: 18.5,
            listing_language: None,
            on_render_failure: RenderFailurePolicy::default(),
            rasterizer: None,
            rasterizer_command: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("graphics_dir", &self.graphics_dir)
            .field("figure_width_cm", &self.figure_width_cm)
            .field("listing_language", &self.listing_language)
            .field("on_render_failure", &self.on_render_failure)
            .field("rasterizer", &self.rasterizer.as_ref().map(|_| "<dyn HtmlRasterizer>"))
            .field("rasterizer_command", &self.rasterizer_command)
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn graphics_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.graphics_dir = dir.into();
        self
    }

    pub fn figure_width_cm(mut self, cm: f32) -> Self {
        self.config.figure_width_cm = cm;
        self
    }

    pub fn listing_language(mut self, language: impl Into<String>) -> Self {
        self.config.listing_language = Some(language.into());
        self
    }

    pub fn on_render_failure(mut self, policy: RenderFailurePolicy) -> Self {
        self.config.on_render_failure = policy;
        self
    }

    pub fn rasterizer(mut self, rasterizer: Arc<dyn HtmlRasterizer>) -> Self {
        self.config.rasterizer = Some(rasterizer);
        self
    }

    pub fn rasterizer_command(mut self, command: impl Into<String>) -> Self {
        self.config.rasterizer_command = Some(command.into());
        self
    }

    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, NbTexError> {
        let c = &self.config;
        if !c.figure_width_cm.is_finite() || c.figure_width_cm <= 0.0 {
            return Err(NbTexError::InvalidConfig(format!(
                "Figure width must be a positive number of centimetres, got {}",
                c.figure_width_cm
            )));
        }
        if c.graphics_dir.as_os_str().is_empty() {
            return Err(NbTexError::InvalidConfig(
                "Graphics directory must not be empty".into(),
            ));
        }
        if let Some(ref cmd) = c.rasterizer_command {
            if cmd.trim().is_empty() {
                return Err(NbTexError::InvalidConfig(
                    "Rasteriser command must not be empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Policy applied when the external rasteriser fails for a figure.
///
/// Historically the tool aborted unconditionally. Both behaviours are
/// defensible, so the choice is a configuration knob rather than a
/// hardcoded policy. Under either policy the figure counter still
/// advances, so the figures that do render keep their encounter-order
/// numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderFailurePolicy {
    /// Abort the whole conversion on the first failed figure. (default)
    #[default]
    Abort,
    /// Emit a `%`-comment placeholder for the failed figure and continue.
    Placeholder,
}
