//! LaTeX fragment constructors and text escaping.
//!
//! Every string of LaTeX the converter emits is built here, so the exact
//! shape of the output document — brace placement, leading newlines, the
//! `Output:` label — lives in exactly one place and is unit-testable
//! without running a conversion.
//!
//! Fragments deliberately start with a `\n` where the historic output did:
//! the assembler joins fragments with single newlines, and these leading
//! newlines are what give the document its blank-line rhythm.

use std::fmt::Write as _;

/// Escape characters that are structurally significant to LaTeX.
///
/// Applied to the title and author strings, which are caller-supplied and
/// land inside `\title{…}`/`\author{…}`. Cell prose is NOT escaped — the
/// historic converter passed markdown text through verbatim and documents
/// depend on embedded LaTeX (math, formatting) surviving conversion.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\textbackslash{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Title text for a sectioning command: all `#` markers removed, `_`
/// replaced by `-`, surrounding whitespace trimmed.
pub fn heading_text(text: &str) -> String {
    text.replace('#', "").replace('_', "-").trim().to_string()
}

/// Markdown prose passed through with only the `_` → `-` substitution.
pub fn prose(text: &str) -> String {
    text.replace('_', "-")
}

/// `\section{…}` fragment for a level-1 markdown heading.
pub fn section(title: &str) -> String {
    format!("\\section{{{title}}}")
}

/// `\subsection{…}` fragment for a level-2-or-deeper markdown heading.
pub fn subsection(title: &str) -> String {
    format!("\\subsection{{{title}}}")
}

/// The `Code` heading inserted before the first listing of a code run.
pub fn code_heading() -> String {
    "\n\\subsubsection{Code}".to_string()
}

/// Verbatim source listing for a code cell.
pub fn code_listing(code: &str, language: &str) -> String {
    format!("\n\\begin{{lstlisting}}[language={language}]\n{code}\n\\end{{lstlisting}}")
}

/// Labeled listing for printed output (stream text or a plain-text result).
pub fn output_listing(text: &str) -> String {
    format!("\nOutput:\n\\begin{{lstlisting}}[language=bash]\n{text}\n\\end{{lstlisting}}")
}

/// Figure environment referencing a rasterised HTML output.
///
/// `figure_nr` drives both the image path and the label, keeping file names
/// and in-document references in lockstep.
pub fn figure(graphics_dir: &str, figure_nr: usize, width_cm: f32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\\begin{{figure}}[H]");
    let _ = writeln!(
        out,
        "\\centerline{{\\includegraphics[width={width_cm}cm]{{{graphics_dir}/figure_{figure_nr}.jpg}}}}"
    );
    let _ = writeln!(out, "\\label{{figure {figure_nr}}}");
    let _ = write!(out, "\\end{{figure}}");
    out
}

/// Comment fragment emitted in place of a figure whose rasterisation failed
/// (placeholder policy only).
pub fn figure_placeholder(figure_nr: usize, detail: &str) -> String {
    format!("% [figure {figure_nr} omitted: {detail}]")
}

/// Map a notebook language name to the `listings` package's language name.
///
/// `listings` matches names case-sensitively ("Python", not "python").
/// Unrecognised names pass through unchanged — `lstlisting` tolerates an
/// unknown language far better than we could guess a mapping.
pub fn listings_language(raw: &str) -> String {
    match raw.to_ascii_lowercase().as_str() {
        "python" | "python3" => "Python".to_string(),
        "r" | "ir" => "R".to_string(),
        "julia" => "Julia".to_string(),
        "bash" | "sh" | "shell" => "bash".to_string(),
        "c++" | "cpp" => "C++".to_string(),
        "java" => "Java".to_string(),
        _ => raw.to_string(),
    }
}
