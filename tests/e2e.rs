//! End-to-end integration tests for nbtex.
//!
//! These drive the public API — `convert`, `convert_to_file`, `inspect` —
//! on synthesized notebooks, with a recording fake standing in for the
//! rasteriser so the suite is hermetic. One optional test exercises the
//! real `wkhtmltoimage` binary and is gated behind the `NBTEX_E2E`
//! environment variable so it does not run in CI unless requested.
//!
//! Run the gated test with:
//!   NBTEX_E2E=1 cargo test --test e2e real_rasterizer -- --nocapture

use nbtex::{
    convert, convert_to_file, inspect, ConversionConfig, HtmlRasterizer, RasterizeFailure,
    RenderFailurePolicy,
};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Fake rasteriser: records every call and writes a stub file so the
/// "image exists" side effect is observable.
struct RecordingRasterizer {
    calls: Mutex<Vec<(String, PathBuf)>>,
    fail_on: Option<usize>,
}

impl RecordingRasterizer {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_on: None,
        })
    }

    /// Fail the `n`-th call (0-indexed), succeed on all others.
    fn failing_on(n: usize) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(n),
        })
    }

    fn paths(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, p)| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }
}

impl HtmlRasterizer for RecordingRasterizer {
    fn rasterize(&self, html: &str, output_path: &Path) -> Result<(), RasterizeFailure> {
        let mut calls = self.calls.lock().unwrap();
        let n = calls.len();
        calls.push((html.to_string(), output_path.to_path_buf()));
        if self.fail_on == Some(n) {
            return Err(RasterizeFailure::Failed {
                detail: "exit status: 1 (simulated)".into(),
            });
        }
        std::fs::write(output_path, b"\xff\xd8stub").map_err(|e| RasterizeFailure::Failed {
            detail: e.to_string(),
        })?;
        Ok(())
    }
}

struct Fixture {
    dir: tempfile::TempDir,
    rasterizer: Arc<RecordingRasterizer>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            rasterizer: RecordingRasterizer::new(),
        }
    }

    fn with_rasterizer(rasterizer: Arc<RecordingRasterizer>) -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            rasterizer,
        }
    }

    fn graphics_dir(&self) -> PathBuf {
        self.dir.path().join("graphics")
    }

    fn config(&self) -> ConversionConfig {
        ConversionConfig::builder()
            .graphics_dir(self.graphics_dir())
            .rasterizer(self.rasterizer.clone())
            .build()
            .unwrap()
    }

    fn notebook(&self, json: &str) -> PathBuf {
        let path = self.dir.path().join("input.ipynb");
        std::fs::write(&path, json).unwrap();
        path
    }
}

// ── Document structure ───────────────────────────────────────────────────────

#[test]
fn markdown_then_code_with_stream_output() {
    let fx = Fixture::new();
    let nb = fx.notebook(
        r##"{"cells": [
             {"cell_type": "markdown", "source": "# Intro"},
             {"cell_type": "code", "source": "print(1)",
              "outputs": [{"output_type": "stream", "name": "stdout", "text": ["1\n"]}]}]}"##,
    );

    let out = convert(&nb, "Example", "Author", &fx.config()).unwrap();
    let tex = &out.latex;

    // head, title, section, Code heading, listing, labeled output, foot — in order
    let positions = [
        tex.find("\\documentclass[journal,onecolumn]{IEEEtran}").unwrap(),
        tex.find("\\title{Example}").unwrap(),
        tex.find("\\section{Intro}").unwrap(),
        tex.find("\\subsubsection{Code}").unwrap(),
        tex.find("\\begin{lstlisting}[language=Python]\nprint(1)").unwrap(),
        tex.find("Output:\n\\begin{lstlisting}[language=bash]\n1\n").unwrap(),
        tex.find("\\end{document}").unwrap(),
    ];
    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "fragments out of order: {positions:?}"
    );
    assert_eq!(out.stats.markdown_cells, 1);
    assert_eq!(out.stats.code_cells, 1);
    assert_eq!(out.stats.rendered_outputs, 1);
}

#[test]
fn second_consecutive_code_cell_has_no_code_heading() {
    let fx = Fixture::new();
    let nb = fx.notebook(
        r#"{"cells": [
             {"cell_type": "code", "source": "a = 1"},
             {"cell_type": "code", "source": "b = 2"}]}"#,
    );

    let out = convert(&nb, "T", "A", &fx.config()).unwrap();
    assert_eq!(out.latex.matches("\\subsubsection{Code}").count(), 1);
}

#[test]
fn display_data_html_produces_one_figure_and_one_write() {
    let fx = Fixture::new();
    let nb = fx.notebook(
        r#"{"cells": [{"cell_type": "code", "source": "plot()",
             "outputs": [{"output_type": "display_data",
                          "data": {"text/html": ["<div>", "plot", "</div>"]}}]}]}"#,
    );

    let out = convert(&nb, "T", "A", &fx.config()).unwrap();

    assert_eq!(out.latex.matches("\\begin{figure}[H]").count(), 1);
    assert!(out.latex.contains("figure_0.jpg"));
    assert!(out.latex.contains("\\label{figure 0}"));
    assert_eq!(out.stats.figures_rendered, 1);

    let calls = fx.rasterizer.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "<div>plot</div>"); // line-array payload concatenated
    assert!(fx.graphics_dir().join("figure_0.jpg").is_file());
}

// ── Figure numbering ─────────────────────────────────────────────────────────

#[test]
fn figure_numbering_is_gapless_across_cells() {
    let fx = Fixture::new();
    let nb = fx.notebook(
        r#"{"cells": [
             {"cell_type": "code", "source": "a",
              "outputs": [{"output_type": "execute_result", "data": {"text/html": "<p>0</p>"}},
                          {"output_type": "stream", "text": "noise"}]},
             {"cell_type": "markdown", "source": "between"},
             {"cell_type": "code", "source": "b",
              "outputs": [{"output_type": "display_data", "data": {"text/html": "<p>1</p>"}},
                          {"output_type": "execute_result", "data": {"text/html": "<p>2</p>"}}]}]}"#,
    );

    let out = convert(&nb, "T", "A", &fx.config()).unwrap();

    assert_eq!(fx.rasterizer.paths(), vec![
        "figure_0.jpg".to_string(),
        "figure_1.jpg".to_string(),
        "figure_2.jpg".to_string(),
    ]);
    for n in 0..3 {
        assert!(out.latex.contains(&format!("\\label{{figure {n}}}")));
        assert!(out.latex.contains(&format!("figure_{n}.jpg")));
    }
    assert_eq!(out.stats.figures_rendered, 3);

    // Encounter order: html payloads arrive in document order.
    let calls = fx.rasterizer.calls.lock().unwrap();
    let htmls: Vec<_> = calls.iter().map(|(h, _)| h.as_str()).collect();
    assert_eq!(htmls, vec!["<p>0</p>", "<p>1</p>", "<p>2</p>"]);
}

#[test]
fn conversion_is_idempotent() {
    let fx = Fixture::new();
    let nb = fx.notebook(
        r##"{"cells": [
             {"cell_type": "markdown", "source": "# Title_here"},
             {"cell_type": "code", "source": "x",
              "outputs": [{"output_type": "execute_result", "data": {"text/html": "<i/>"}}]}]}"##,
    );
    let config = fx.config();

    let first = convert(&nb, "T", "A", &config).unwrap();
    let second = convert(&nb, "T", "A", &config).unwrap();

    assert_eq!(first.latex, second.latex);
    // Both runs asked for the same file names, starting again from 0.
    assert_eq!(fx.rasterizer.paths(), vec![
        "figure_0.jpg".to_string(),
        "figure_0.jpg".to_string(),
    ]);
}

// ── Unsupported outputs ──────────────────────────────────────────────────────

#[test]
fn unsupported_outputs_leave_a_blank_line_not_an_error() {
    let fx = Fixture::new();
    let nb = fx.notebook(
        r#"{"cells": [{"cell_type": "code", "source": "boom()",
             "outputs": [{"output_type": "error", "ename": "ValueError",
                          "evalue": "bad", "traceback": ["tb"]},
                         {"output_type": "some_future_kind"}]}]}"#,
    );

    let out = convert(&nb, "T", "A", &fx.config()).unwrap();

    assert_eq!(out.stats.skipped_outputs, 2);
    assert!(!out.latex.contains("ValueError"));
    // Two None fragments between the listing and the footer: blank lines only.
    assert!(out
        .latex
        .contains("\\end{lstlisting}\n\n\n\n%\\bibliographystyle"));
}

// ── Failure policies ─────────────────────────────────────────────────────────

#[test]
fn abort_policy_fails_the_whole_conversion() {
    let fx = Fixture::with_rasterizer(RecordingRasterizer::failing_on(0));
    let nb = fx.notebook(
        r#"{"cells": [{"cell_type": "code", "source": "x",
             "outputs": [{"output_type": "display_data", "data": {"text/html": "<p/>"}}]}]}"#,
    );

    let err = convert(&nb, "T", "A", &fx.config()).unwrap_err();
    assert!(err.to_string().contains("figure 0"));
}

#[test]
fn placeholder_policy_skips_the_bad_figure_and_keeps_numbering() {
    let fx = Fixture::with_rasterizer(RecordingRasterizer::failing_on(0));
    let nb = fx.notebook(
        r#"{"cells": [{"cell_type": "code", "source": "x",
             "outputs": [{"output_type": "display_data", "data": {"text/html": "<p>bad</p>"}},
                         {"output_type": "display_data", "data": {"text/html": "<p>good</p>"}}]}]}"#,
    );
    let config = ConversionConfig::builder()
        .graphics_dir(fx.graphics_dir())
        .rasterizer(fx.rasterizer.clone())
        .on_render_failure(RenderFailurePolicy::Placeholder)
        .build()
        .unwrap();

    let out = convert(&nb, "T", "A", &config).unwrap();

    assert!(out.latex.contains("% [figure 0 omitted"));
    assert!(out.latex.contains("figure_1.jpg"));
    assert!(!out.latex.contains("figure_0.jpg"));
    assert_eq!(out.stats.figures_rendered, 1);
    assert_eq!(out.stats.figures_skipped, 1);
}

// ── Markdown handling ────────────────────────────────────────────────────────

#[test]
fn heading_levels_and_underscores() {
    let fx = Fixture::new();
    let nb = fx.notebook(
        r###"{"cells": [
             {"cell_type": "markdown", "source": "# data_load"},
             {"cell_type": "markdown", "source": "## data_prep"},
             {"cell_type": "markdown", "source": "plain text with snake_case"}]}"###,
    );

    let out = convert(&nb, "T", "A", &fx.config()).unwrap();

    assert!(out.latex.contains("\\section{data-load}"));
    assert!(out.latex.contains("\\subsection{data-prep}"));
    assert!(out.latex.contains("plain text with snake-case"));
    assert!(!out.latex.contains("\\section{data-prep}"));
}

#[test]
fn title_and_author_are_latex_escaped() {
    let fx = Fixture::new();
    let nb = fx.notebook(r#"{"cells": []}"#);

    let out = convert(&nb, "P&L for Q1_2024", "R. O'Hare & co", &fx.config()).unwrap();

    assert!(out.latex.contains("\\title{P\\&L for Q1\\_2024}"));
    assert!(out.latex.contains("\\author{R. O'Hare \\& co}"));
}

// ── File output, language, inspect ───────────────────────────────────────────

#[test]
fn convert_to_file_writes_and_overwrites() {
    let fx = Fixture::new();
    let nb = fx.notebook(
        r##"{"cells": [{"cell_type": "markdown", "source": "# A"}]}"##,
    );
    let out_path = fx.dir.path().join("out").join("doc.tex");

    let first = convert_to_file(&nb, &out_path, "T", "A", &fx.config()).unwrap();
    let on_disk = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(on_disk, first.latex);

    // Re-running overwrites wholesale and stays byte-identical.
    convert_to_file(&nb, &out_path, "T", "A", &fx.config()).unwrap();
    assert_eq!(std::fs::read_to_string(&out_path).unwrap(), on_disk);
}

#[test]
fn listing_language_follows_notebook_metadata() {
    let fx = Fixture::new();
    let nb = fx.notebook(
        r#"{"cells": [{"cell_type": "code", "source": "x <- 1"}],
            "metadata": {"language_info": {"name": "R"}}}"#,
    );

    let out = convert(&nb, "T", "A", &fx.config()).unwrap();
    assert!(out.latex.contains("\\begin{lstlisting}[language=R]"));
}

#[test]
fn inspect_reports_shape_without_touching_the_rasterizer() {
    let fx = Fixture::new();
    let nb = fx.notebook(
        r##"{"cells": [
             {"cell_type": "markdown", "source": "# t"},
             {"cell_type": "code", "source": "df",
              "outputs": [{"output_type": "execute_result",
                           "data": {"text/html": "<table/>"}}]}],
            "metadata": {"kernelspec": {"name": "python3"}}}"##,
    );

    let summary = inspect(&nb).unwrap();
    assert_eq!(summary.cells, 2);
    assert_eq!(summary.html_outputs, 1);
    assert_eq!(summary.kernel.as_deref(), Some("python3"));
    assert!(fx.rasterizer.calls.lock().unwrap().is_empty());
}

#[test]
fn missing_input_is_a_clear_error() {
    let fx = Fixture::new();
    let err = convert(
        fx.dir.path().join("nope.ipynb"),
        "T",
        "A",
        &fx.config(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

// ── Real rasteriser (gated) ──────────────────────────────────────────────────

/// Exercises the actual `wkhtmltoimage` subprocess path.
#[test]
fn real_rasterizer_renders_a_jpeg() {
    if std::env::var("NBTEX_E2E").is_err() {
        println!("SKIP — set NBTEX_E2E=1 (requires wkhtmltoimage on PATH)");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let nb_path = dir.path().join("input.ipynb");
    let mut f = std::fs::File::create(&nb_path).unwrap();
    write!(
        f,
        r#"{{"cells": [{{"cell_type": "code", "source": "df",
             "outputs": [{{"output_type": "execute_result",
                           "data": {{"text/html": "<table><tr><td>1</td></tr></table>"}}}}]}}]}}"#
    )
    .unwrap();

    let config = ConversionConfig::builder()
        .graphics_dir(dir.path().join("graphics"))
        .build()
        .unwrap();

    let out = convert(&nb_path, "T", "A", &config).expect("conversion should succeed");
    let image = dir.path().join("graphics").join("figure_0.jpg");
    assert!(image.is_file(), "expected {} to exist", image.display());
    assert!(out.stats.raster_duration_ms > 0);
}
