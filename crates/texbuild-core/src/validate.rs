/*
 * validate.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Two-phase incremental build validation.
 */

//! Two-phase incremental build validation.
//!
//! Phase one (BasicBuildTest) compiles the main document with every content
//! inclusion commented out, so only the preamble and style packages are
//! exercised. Phase two (FullBuildTest) compiles the unmodified document.
//! Both results are always captured; an individual phase failing does not
//! abort the run.
//!
//! The load-bearing invariant is restoration: the working-copy substitution
//! in phase one is scoped by [`WorkingCopy`], whose `Drop` writes the
//! original bytes back even if the compiler invocation errors or panics.
//! Explicit restoration failure is the one fatal condition
//! ([`CheckError::RestorationFailed`]); every other failure is recorded and
//! reported.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::CheckError;
use crate::latex::LatexTool;
use crate::report::CompileResult;
use crate::scan::is_content_directive_line;

/// Results of both build phases. Completed means both phases ran,
/// regardless of their individual success.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    /// Content-suppressed phase
    pub basic: CompileResult,
    /// Full-document phase
    pub full: CompileResult,
}

/// Scoped substitution of the main document with a working copy.
///
/// Construction reads the original bytes and writes the substitute;
/// [`restore`](WorkingCopy::restore) writes the original back and reports
/// failure as [`CheckError::RestorationFailed`]. If the guard is dropped
/// without an explicit restore (early return, panic), `Drop` restores
/// best-effort as a backstop.
struct WorkingCopy {
    path: PathBuf,
    original: Vec<u8>,
    restored: bool,
}

impl WorkingCopy {
    fn substitute(path: &Path, content: &str) -> Result<Self, CheckError> {
        let original = fs::read(path)?;
        fs::write(path, content)?;
        Ok(WorkingCopy {
            path: path.to_path_buf(),
            original,
            restored: false,
        })
    }

    fn restore(mut self) -> Result<(), CheckError> {
        match fs::write(&self.path, &self.original) {
            Ok(()) => {
                self.restored = true;
                Ok(())
            }
            // Drop will retry once as a backstop before the error propagates.
            Err(source) => Err(CheckError::RestorationFailed {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl Drop for WorkingCopy {
    fn drop(&mut self) {
        if !self.restored {
            let _ = fs::write(&self.path, &self.original);
        }
    }
}

/// Comment out every active content inclusion line, leaving style lines and
/// already-commented lines untouched. Idempotent: a commented line no longer
/// matches the directive pattern.
pub fn comment_out_content(doc: &str) -> String {
    let mut out = String::with_capacity(doc.len());
    for segment in doc.split_inclusive('\n') {
        if is_content_directive_line(segment) {
            out.push_str("% ");
        }
        out.push_str(segment);
    }
    out
}

/// Run both build phases against `main_doc`.
///
/// On return the document on disk is byte-identical to its state on entry;
/// only [`CheckError::RestorationFailed`] violates that, and it aborts the
/// run.
pub fn validate(main_doc: &Path, tool: &LatexTool) -> Result<ValidationOutcome, CheckError> {
    let original = fs::read_to_string(main_doc)?;
    let suppressed = comment_out_content(&original);

    info!("basic build test (content suppressed): {}", main_doc.display());
    let working = WorkingCopy::substitute(main_doc, &suppressed)?;
    let basic = tool.compile(main_doc);
    // Restoration must complete before the result is even looked at.
    working.restore()?;
    let basic = basic?;
    debug!("basic phase: success={}", basic.success());

    info!("full build test: {}", main_doc.display());
    let full = tool.compile(main_doc)?;
    debug!("full phase: success={}", full.success());

    Ok(ValidationOutcome { basic, full })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_out_only_active_content_lines() {
        // Explicit \n escapes: line continuations would strip the indent
        // this test is about.
        let doc = "\\usepackage{styles/x}\n\\input{content/a}\n% \\input{content/b}\n  \\include{content/c}\ntext line\n";
        let suppressed = comment_out_content(doc);
        assert_eq!(
            suppressed,
            "\\usepackage{styles/x}\n% \\input{content/a}\n% \\input{content/b}\n%   \\include{content/c}\ntext line\n"
        );
    }

    #[test]
    fn suppression_is_idempotent() {
        let doc = "\\input{content/a}\nbody\n";
        let once = comment_out_content(doc);
        assert_eq!(comment_out_content(&once), once);
    }

    #[test]
    fn preserves_missing_trailing_newline() {
        let doc = "\\input{content/a}";
        assert_eq!(comment_out_content(doc), "% \\input{content/a}");
    }

    #[test]
    fn working_copy_restores_on_drop() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("main.tex");
        fs::write(&path, "original").unwrap();

        {
            let _working = WorkingCopy::substitute(&path, "substituted").unwrap();
            assert_eq!(fs::read_to_string(&path).unwrap(), "substituted");
            // dropped without explicit restore
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn restoration_failure_is_fatal_and_distinct() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("main.tex");
        fs::write(&path, "original").unwrap();

        let working = WorkingCopy::substitute(&path, "substituted").unwrap();
        // Make the restore write impossible: a directory now occupies the
        // document's path. (A read-only permission bit would not do - root
        // bypasses it.)
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let err = working.restore().unwrap_err();
        assert!(matches!(err, CheckError::RestorationFailed { .. }));
        let message = err.to_string();
        assert!(message.contains("could not restore"));
        assert!(
            message.contains("not an ordinary compile failure"),
            "restoration failure must be distinguishable from a compile failure"
        );
    }

    #[test]
    fn working_copy_explicit_restore() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("main.tex");
        fs::write(&path, "original").unwrap();

        let working = WorkingCopy::substitute(&path, "substituted").unwrap();
        working.restore().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "original");
    }
}
