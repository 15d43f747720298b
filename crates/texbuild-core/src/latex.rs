/*
 * latex.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * LaTeX compiler discovery and invocation.
 */

//! LaTeX compiler discovery and invocation.
//!
//! This module provides functions for:
//! - Finding the pdflatex binary on the system
//! - Running one blocking compile with an explicit timeout
//! - Inspecting the produced artifact into a [`CompileResult`]
//!
//! # Finding pdflatex
//!
//! [`find_latex`] searches in this order:
//! 1. `TEXBUILD_LATEX` environment variable (path to a TeX installation
//!    directory or directly to the compiler binary)
//! 2. System PATH via `which`
//!
//! # Invocation contract
//!
//! Only the exit status and the artifact's bytes are inspected; compiler log
//! output is not interpreted. A timeout kills the subprocess and yields a
//! failed [`CompileResult`], never an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::CheckError;
use crate::report::{ARTIFACT_SIGNATURE, CompileResult};

/// Environment variable overriding compiler discovery.
pub const LATEX_ENV_VAR: &str = "TEXBUILD_LATEX";

/// Default compile timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Interval at which a running compile is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Find the pdflatex binary on the system.
///
/// `TEXBUILD_LATEX` may point directly at the binary or at an installation
/// directory (checked for `bin/pdflatex`, then `pdflatex`). Falls back to a
/// PATH lookup.
pub fn find_latex() -> Option<PathBuf> {
    if let Ok(configured) = std::env::var(LATEX_ENV_VAR) {
        let configured = PathBuf::from(configured);

        if configured.is_file() {
            return Some(configured);
        }

        if configured.is_dir() {
            let in_bin = configured.join("bin").join(latex_name());
            if in_bin.is_file() {
                return Some(in_bin);
            }
            let direct = configured.join(latex_name());
            if direct.is_file() {
                return Some(direct);
            }
        }
    }

    which::which(latex_name()).ok()
}

/// Platform-appropriate compiler binary name.
fn latex_name() -> &'static str {
    #[cfg(windows)]
    {
        "pdflatex.exe"
    }
    #[cfg(not(windows))]
    {
        "pdflatex"
    }
}

/// A discovered LaTeX compiler plus invocation policy.
#[derive(Debug, Clone)]
pub struct LatexTool {
    program: PathBuf,
    timeout: Duration,
}

impl LatexTool {
    /// Wrap an explicit compiler binary.
    pub fn new(program: PathBuf, timeout: Duration) -> Self {
        LatexTool { program, timeout }
    }

    /// Discover the compiler via [`find_latex`].
    pub fn discover(timeout: Duration) -> Result<Self, CheckError> {
        let program = find_latex().ok_or(CheckError::LatexNotFound)?;
        Ok(LatexTool { program, timeout })
    }

    /// Path of the wrapped compiler binary.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Compile `doc` and inspect the sibling `.pdf` artifact.
    ///
    /// Runs in the document's directory so relative `\input` paths resolve.
    /// A stale artifact from an earlier phase is removed first so the result
    /// only ever reflects this invocation.
    pub fn compile(&self, doc: &Path) -> Result<CompileResult, CheckError> {
        let workdir = doc
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name = doc
            .file_name()
            .ok_or_else(|| CheckError::InvalidDocumentPath(doc.to_path_buf()))?;

        let artifact = doc.with_extension("pdf");
        match fs::remove_file(&artifact) {
            Ok(()) => debug!("removed stale artifact {}", artifact.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        debug!(
            "compiling {} with {} (timeout {:?})",
            doc.display(),
            self.program.display(),
            self.timeout
        );

        let mut child = Command::new(&self.program)
            .arg("-interaction=nonstopmode")
            .arg("-halt-on-error")
            .arg(file_name)
            .current_dir(&workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let deadline = Instant::now() + self.timeout;
        let exit_ok = loop {
            match child.try_wait()? {
                Some(status) => break status.success(),
                None if Instant::now() >= deadline => {
                    warn!(
                        "compile of {} exceeded timeout ({:?}), killing",
                        doc.display(),
                        self.timeout
                    );
                    let _ = child.kill();
                    let _ = child.wait();
                    break false;
                }
                None => std::thread::sleep(POLL_INTERVAL),
            }
        };

        Ok(inspect_artifact(exit_ok, &artifact))
    }
}

/// Build a [`CompileResult`] from the exit status and the artifact's bytes.
fn inspect_artifact(exit_ok: bool, artifact: &Path) -> CompileResult {
    let Ok(meta) = fs::metadata(artifact) else {
        return CompileResult {
            exit_ok,
            artifact_exists: false,
            artifact_size: 0,
            artifact_header_valid: false,
        };
    };

    CompileResult {
        exit_ok,
        artifact_exists: true,
        artifact_size: meta.len(),
        artifact_header_valid: header_matches(artifact),
    }
}

/// Read just the leading bytes; the artifact can be large.
fn header_matches(artifact: &Path) -> bool {
    use std::io::Read;

    let mut buf = [0u8; ARTIFACT_SIGNATURE.len()];
    match fs::File::open(artifact).and_then(|mut f| f.read_exact(&mut buf)) {
        Ok(()) => buf == *ARTIFACT_SIGNATURE,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MIN_ARTIFACT_SIZE;
    use tempfile::TempDir;

    #[test]
    fn inspect_missing_artifact() {
        let temp = TempDir::new().unwrap();
        let result = inspect_artifact(true, &temp.path().join("absent.pdf"));
        assert!(result.exit_ok);
        assert!(!result.artifact_exists);
        assert!(!result.success());
    }

    #[test]
    fn inspect_valid_artifact() {
        let temp = TempDir::new().unwrap();
        let artifact = temp.path().join("doc.pdf");
        let mut bytes = b"%PDF-1.4\n".to_vec();
        bytes.resize(MIN_ARTIFACT_SIZE as usize + 64, 0);
        fs::write(&artifact, &bytes).unwrap();

        let result = inspect_artifact(true, &artifact);
        assert!(result.success());
        assert_eq!(result.artifact_size, bytes.len() as u64);
    }

    #[test]
    fn inspect_artifact_shorter_than_signature() {
        let temp = TempDir::new().unwrap();
        let artifact = temp.path().join("doc.pdf");
        fs::write(&artifact, b"%P").unwrap();

        let result = inspect_artifact(true, &artifact);
        assert!(result.artifact_exists);
        assert!(!result.artifact_header_valid);
        assert!(!result.success());
    }

    #[test]
    fn inspect_wrong_signature() {
        let temp = TempDir::new().unwrap();
        let artifact = temp.path().join("doc.pdf");
        let mut bytes = b"not a pdf".to_vec();
        bytes.resize(MIN_ARTIFACT_SIZE as usize + 64, 0);
        fs::write(&artifact, &bytes).unwrap();

        let result = inspect_artifact(true, &artifact);
        assert!(!result.artifact_header_valid);
        assert!(!result.success());
    }
}
