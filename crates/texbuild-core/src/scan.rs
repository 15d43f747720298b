/*
 * scan.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Reference extraction from the main document.
 */

//! Reference extraction from the main document.
//!
//! The scanner is line-oriented: each line is checked for one of two
//! directive forms, a style inclusion (`\usepackage{...}`) or a content
//! inclusion (`\input{...}` / `\include{...}`). Matches are collected in
//! first-appearance order and deduplicated by exact path, because downstream
//! reporting is order-sensitive for human review.
//!
//! Comment handling is an explicit decision here: everything after an
//! unescaped `%` is stripped before matching, so commented-out directives are
//! NOT picked up. The validator relies on this when it suppresses content
//! inclusions by commenting them out (see [`crate::validate`]).

use regex::Regex;
use std::sync::LazyLock;

/// Style inclusion directive: `\usepackage{path}`, optional `[options]`.
static STYLE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    // Pattern breakdown:
    // \\usepackage      - the command
    // (?:\[[^\]]*\])?   - optional bracketed options, not captured
    // \{([^}]+)\}       - the package path (captured group 1)
    Regex::new(r"\\usepackage(?:\[[^\]]*\])?\{([^}]+)\}")
        .expect("Invalid regex pattern for style directive")
});

/// Content inclusion directive: `\input{path}` or `\include{path}`.
static CONTENT_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:input|include)\{([^}]+)\}")
        .expect("Invalid regex pattern for content directive")
});

/// Content inclusion directive anchored to the start of a (possibly
/// indented) line. Used by the validator to decide which raw lines to
/// comment out; an already commented line does not match.
static CONTENT_DIRECTIVE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\\(?:input|include)\{[^}]+\}")
        .expect("Invalid regex pattern for content directive line")
});

/// The two kinds of component a main document can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// Macro-providing component (`\usepackage`, stored as `.sty`)
    Style,
    /// Text-providing component (`\input`/`\include`, stored as `.tex`)
    Content,
}

impl RefKind {
    /// File extension appended when the reference path carries none.
    pub fn extension(self) -> &'static str {
        match self {
            RefKind::Style => "sty",
            RefKind::Content => "tex",
        }
    }
}

/// A declared dependency from the main document to a component file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Path argument exactly as written in the directive
    pub path: String,
    /// Style or content classification
    pub kind: RefKind,
}

/// Result of scanning a main document, immutable once produced.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Style references in first-appearance order, deduplicated by path
    pub styles: Vec<Reference>,
    /// Content references in first-appearance order, deduplicated by path
    pub contents: Vec<Reference>,
}

/// Extract the ordered, deduplicated reference lists from a main document.
pub fn scan(main_doc: &str) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    for line in main_doc.lines() {
        let active = strip_comment(line);

        if let Some(caps) = STYLE_DIRECTIVE.captures(active) {
            push_unique(&mut outcome.styles, &caps[1], RefKind::Style);
        }
        if let Some(caps) = CONTENT_DIRECTIVE.captures(active) {
            push_unique(&mut outcome.contents, &caps[1], RefKind::Content);
        }
    }

    outcome
}

/// Whether a raw line is an active (uncommented) content inclusion.
pub fn is_content_directive_line(line: &str) -> bool {
    CONTENT_DIRECTIVE_LINE.is_match(line)
}

/// Remove everything from the first unescaped `%` onward.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'%' && (i == 0 || bytes[i - 1] != b'\\') {
            return &line[..i];
        }
    }
    line
}

fn push_unique(list: &mut Vec<Reference>, path: &str, kind: RefKind) {
    if !list.iter().any(|r| r.path == path) {
        list.push(Reference {
            path: path.to_string(),
            kind,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r"\documentclass{book}
\usepackage{styles/notation}
\usepackage[margin=1in]{geometry}
\begin{document}
\input{content/intro}
\include{content/methods}
\input{content/intro}
\end{document}
";

    #[test]
    fn classifies_and_orders_references() {
        let outcome = scan(DOC);
        let style_paths: Vec<&str> = outcome.styles.iter().map(|r| r.path.as_str()).collect();
        let content_paths: Vec<&str> = outcome.contents.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(style_paths, ["styles/notation", "geometry"]);
        assert_eq!(content_paths, ["content/intro", "content/methods"]);
        assert!(outcome.styles.iter().all(|r| r.kind == RefKind::Style));
        assert!(outcome.contents.iter().all(|r| r.kind == RefKind::Content));
    }

    #[test]
    fn dedupes_by_exact_path() {
        let outcome = scan("\\input{a}\n\\input{a}\n\\input{a/}\n");
        let paths: Vec<&str> = outcome.contents.iter().map(|r| r.path.as_str()).collect();
        // "a" and "a/" are different paths: dedupe is exact, not normalized
        assert_eq!(paths, ["a", "a/"]);
    }

    #[test]
    fn skips_commented_directives() {
        let doc = "% \\input{content/dropped}\n\\input{content/kept} % \\input{content/trailing}\n";
        let outcome = scan(doc);
        let paths: Vec<&str> = outcome.contents.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, ["content/kept"]);
    }

    #[test]
    fn escaped_percent_is_not_a_comment() {
        let doc = "\\input{content/a} \\% literal percent \\input{content/b}\n";
        let outcome = scan(doc);
        // Only the first directive on a line is recorded (line-oriented scan),
        // but the escaped percent must not truncate the line before it.
        assert_eq!(strip_comment(doc.lines().next().unwrap()), doc.lines().next().unwrap());
        assert_eq!(outcome.contents[0].path, "content/a");
    }

    #[test]
    fn options_are_ignored() {
        let outcome = scan("\\usepackage[draft,12pt]{styles/layout}\n");
        assert_eq!(outcome.styles[0].path, "styles/layout");
    }

    #[test]
    fn content_line_detection() {
        assert!(is_content_directive_line("\\input{content/a}"));
        assert!(is_content_directive_line("  \\include{content/a}"));
        assert!(!is_content_directive_line("% \\input{content/a}"));
        assert!(!is_content_directive_line("\\usepackage{styles/a}"));
    }
}
