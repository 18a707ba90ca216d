//! Typed model of the Jupyter notebook (`.ipynb`) format.
//!
//! Only the subset of nbformat 4.x that the converter consumes is modelled:
//! cells, their sources, their outputs, and the kernel/language metadata.
//! Everything else in the file (cell ids, execution metadata, widget state)
//! is ignored by serde.
//!
//! ## Why closed enums instead of `serde_json::Value`?
//!
//! The historic converter dispatched on string tags pulled out of a generic
//! JSON tree, so a new or misspelt `output_type` silently fell through every
//! branch. Modelling [`Cell`] and [`Output`] as internally tagged enums with
//! an explicit `Unknown` catch-all keeps the dispatch exhaustive: the
//! compiler forces every consumer to say what happens to an unrecognised
//! kind, and the pipeline logs the skip instead of losing it.

use serde::Deserialize;
use std::collections::BTreeMap;

/// A deserialized notebook: ordered cells plus document-level metadata.
///
/// Loaded once by [`crate::pipeline::input::load_notebook`] and immutable
/// afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct Notebook {
    /// Cells in source order.
    pub cells: Vec<Cell>,

    /// Kernel and language metadata. Absent in minimal/hand-written files.
    #[serde(default)]
    pub metadata: NotebookMetadata,

    /// Major nbformat version, when declared.
    #[serde(default)]
    pub nbformat: Option<u32>,
}

impl Notebook {
    /// The language name declared by the notebook's kernel, if any.
    ///
    /// Prefers `metadata.language_info.name` (the canonical field) and falls
    /// back to the kernelspec name, which is usually close enough
    /// ("python3", "ir").
    pub fn language(&self) -> Option<&str> {
        self.metadata
            .language_info
            .as_ref()
            .map(|l| l.name.as_str())
            .or_else(|| self.metadata.kernelspec.as_ref().map(|k| k.name.as_str()))
    }
}

/// Notebook-level metadata relevant to conversion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotebookMetadata {
    #[serde(default)]
    pub kernelspec: Option<Kernelspec>,
    #[serde(default)]
    pub language_info: Option<LanguageInfo>,
}

/// The `metadata.kernelspec` block.
#[derive(Debug, Clone, Deserialize)]
pub struct Kernelspec {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// The `metadata.language_info` block.
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageInfo {
    pub name: String,
}

/// One unit of notebook content, tagged by `cell_type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "cell_type", rename_all = "snake_case")]
pub enum Cell {
    /// Prose cell; the source is markdown text.
    Markdown { source: MultilineText },

    /// Executable cell with captured outputs.
    Code {
        source: MultilineText,
        #[serde(default)]
        outputs: Vec<Output>,
        #[serde(default)]
        execution_count: Option<i64>,
    },

    /// Raw cell: passed through to no output format we target.
    Raw { source: MultilineText },

    /// Any `cell_type` this converter does not recognise.
    #[serde(other)]
    Unknown,
}

impl Cell {
    /// Tag name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Cell::Markdown { .. } => "markdown",
            Cell::Code { .. } => "code",
            Cell::Raw { .. } => "raw",
            Cell::Unknown => "unknown",
        }
    }
}

/// Captured result of running a code cell, tagged by `output_type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    /// Printed stdout/stderr text.
    Stream { text: MultilineText },

    /// The returned value's representation, as a MIME bundle.
    ExecuteResult {
        #[serde(default)]
        data: MimeBundle,
    },

    /// Rich content displayed during execution, as a MIME bundle.
    DisplayData {
        #[serde(default)]
        data: MimeBundle,
    },

    /// An exception traceback. Not rendered.
    Error,

    /// Any `output_type` this converter does not recognise. Not rendered.
    #[serde(other)]
    Unknown,
}

impl Output {
    /// Tag name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Output::Stream { .. } => "stream",
            Output::ExecuteResult { .. } => "execute_result",
            Output::DisplayData { .. } => "display_data",
            Output::Error => "error",
            Output::Unknown => "unknown",
        }
    }
}

/// Notebook text that is either a single string or a list of line strings.
///
/// nbformat stores cell sources and stream text as arrays of lines (each
/// keeping its own trailing `\n`), but single strings are equally valid and
/// common in hand-edited files. Both shapes concatenate to the same text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MultilineText {
    Single(String),
    Lines(Vec<String>),
}

impl MultilineText {
    /// Concatenate into one string. Lines already carry their newlines.
    pub fn concat(&self) -> String {
        match self {
            MultilineText::Single(s) => s.clone(),
            MultilineText::Lines(lines) => lines.concat(),
        }
    }
}

impl Default for MultilineText {
    fn default() -> Self {
        MultilineText::Single(String::new())
    }
}

/// A MIME type → payload mapping from `execute_result`/`display_data`.
///
/// Payload values are kept as raw JSON: text-like entries are a string or a
/// list of strings, but bundles also legitimately carry structured payloads
/// (`application/json`) that the converter never touches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct MimeBundle(pub BTreeMap<String, serde_json::Value>);

impl MimeBundle {
    /// The concatenated text payload for `mime`, when present and text-like.
    pub fn text(&self, mime: &str) -> Option<String> {
        match self.0.get(mime)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .concat(),
            ),
            _ => None,
        }
    }

    /// The `text/html` payload, when present.
    pub fn html(&self) -> Option<String> {
        self.text("text/html")
    }

    /// The `text/plain` payload, when present.
    pub fn plain_text(&self) -> Option<String> {
        self.text("text/plain")
    }

    /// True when the bundle carries a text-like `text/html` entry.
    pub fn has_html(&self) -> bool {
        self.html().is_some()
    }
}
