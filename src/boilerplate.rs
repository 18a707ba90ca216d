//! Fixed LaTeX boilerplate wrapped around the converted cells.
//!
//! Centralising the preamble and footer here serves two purposes:
//!
//! 1. **Single source of truth** — the document class, the `listings` style,
//!    and the commented-out bibliography hooks are edited in exactly one
//!    place.
//!
//! 2. **Testability** — the assembler tests can assert head/foot placement
//!    against these constants instead of duplicating the strings.
//!
//! The preamble is constant by design: the only parameterised part of the
//! document frame is the title block, built by [`title_block`].

use crate::latex;

/// Document preamble: IEEE journal class plus the `listings` setup used by
/// every code and output fragment.
pub const HEAD: &str = r"
\documentclass[journal,onecolumn]{IEEEtran}

\usepackage{listings}
\usepackage{hyperref}
\usepackage{xcolor}
\usepackage{titlesec}
\usepackage{graphicx}
\usepackage{float}
\usepackage{dblfloatfix}
\usepackage{amsmath}
\setcounter{MaxMatrixCols}{32}

\definecolor{codegreen}{rgb}{0,0.6,0}
\definecolor{codegray}{rgb}{0.5,0.5,0.5}
\definecolor{codepurple}{rgb}{0.58,0,0.82}
\definecolor{backcolour}{rgb}{0.95,0.95,0.92}

\lstdefinestyle{mystyle}{
    backgroundcolor=\color{backcolour},
    commentstyle=\color{codegreen},
    keywordstyle=\color{magenta},
    numberstyle=\tiny\color{codegray},
    stringstyle=\color{codepurple},
    basicstyle=\ttfamily\footnotesize,
    breakatwhitespace=false,
    breaklines=true,
    captionpos=b,
    keepspaces=true,
    numbers=left,
    numbersep=5pt,
    showspaces=false,
    showstringspaces=false,
    showtabs=false,
    tabsize=2
}

\lstset{style=mystyle}


% correct bad hyphenation here
\hyphenation{op-tical net-works semi-conduc-tor}


\begin{document}";

/// Document footer, with the bibliography hooks left commented out the way
/// the generated documents historically shipped them.
pub const FOOT: &str = r"
%\bibliographystyle{ieeetr}
%\bibliography{refrences}
\end{document}
";

/// Title block: `\title`, `\author`, `\maketitle`.
///
/// Title and author are caller-supplied free text and are LaTeX-escaped
/// before insertion.
pub fn title_block(title: &str, author: &str) -> String {
    format!(
        "\n\\title{{{}}}\n\n\\author{{{}}}\n\n\\maketitle",
        latex::escape(title),
        latex::escape(author)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_opens_document_and_foot_closes_it() {
        assert!(HEAD.contains("\\documentclass[journal,onecolumn]{IEEEtran}"));
        assert!(HEAD.trim_end().ends_with("\\begin{document}"));
        assert!(FOOT.contains("\\end{document}"));
    }

    #[test]
    fn title_block_inserts_both_fields() {
        let block = title_block("My Report", "Jane Doe");
        assert!(block.contains("\\title{My Report}"));
        assert!(block.contains("\\author{Jane Doe}"));
        assert!(block.contains("\\maketitle"));
    }

    #[test]
    fn title_block_escapes_special_characters() {
        let block = title_block("Profit & Loss_2024", "A% B");
        assert!(block.contains("\\title{Profit \\& Loss\\_2024}"));
        assert!(block.contains("\\author{A\\% B}"));
    }
}
