/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Reference resolution and incremental build validation for LaTeX
 * manuscripts.
 */

//! Core build-check pipeline for LaTeX manuscripts.
//!
//! A main document declares two kinds of component references: style
//! packages (`\usepackage`) and content files (`\input`/`\include`). This
//! crate scans those references, scaffolds placeholders for missing ones,
//! and smoke-tests the document with a two-phase compile
//! (content-suppressed, then full) whose working-copy substitution is
//! guaranteed to be restored on every exit path.
//!
//! The top-level entry point is [`check_document`]; the individual steps
//! ([`resolve::resolve`], [`validate::validate`]) are public for callers
//! that need only one of them.

pub mod error;
pub mod latex;
pub mod report;
pub mod resolve;
pub mod sanitize;
pub mod scaffold;
pub mod scan;
pub mod validate;

pub use error::CheckError;
pub use latex::{DEFAULT_TIMEOUT, LatexTool, find_latex};
pub use report::{BuildReport, CompileResult, MIN_ARTIFACT_SIZE};
pub use resolve::{ResolveOutcome, resolve};
pub use sanitize::sanitize;
pub use scan::{RefKind, Reference, ScanOutcome, scan};
pub use validate::{ValidationOutcome, validate};

use std::path::Path;

/// Run the full pipeline: resolve missing components, then validate the
/// build in two phases. Returns a per-run [`BuildReport`]; no state is
/// shared between invocations.
pub fn check_document(main_doc: &Path, tool: &LatexTool) -> Result<BuildReport, CheckError> {
    let resolved = resolve::resolve(main_doc)?;
    let validated = validate::validate(main_doc, tool)?;

    Ok(BuildReport {
        style_count: resolved.scan.styles.len(),
        content_count: resolved.scan.contents.len(),
        missing_before: resolved.missing_before,
        generated: resolved.generated,
        basic: validated.basic,
        full: validated.full,
    })
}
