/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Error types for reference resolution and build validation.
 */

//! Error types for the check pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving references or validating a build.
///
/// Missing component files are not represented here: they are repaired in
/// place by scaffolding and never surface as an error. Compile failures are
/// likewise not errors; they are recorded per-phase in the
/// [`CompileResult`](crate::report::CompileResult).
#[derive(Debug, Error)]
pub enum CheckError {
    /// No LaTeX compiler could be located.
    #[error(
        "LaTeX compiler not found: set TEXBUILD_LATEX to a pdflatex binary \
         (or installation directory), or install pdflatex on PATH"
    )]
    LatexNotFound,

    /// The main document path has no parent directory or no file name.
    #[error("invalid main document path: {0}")]
    InvalidDocumentPath(PathBuf),

    /// Restoring the main document after the content-suppressed build phase
    /// failed. This is the only fatal condition in the validator: continuing
    /// would compile against a corrupted main document.
    #[error(
        "FATAL: could not restore main document {path} after the \
         content-suppressed build phase (this is not an ordinary compile \
         failure): {source}"
    )]
    RestorationFailed {
        /// The document that could not be restored
        path: PathBuf,
        /// The underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// IO error while reading or writing project files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
