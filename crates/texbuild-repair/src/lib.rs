/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Escaping repair engine for converter-produced LaTeX.
 */

//! Escaping repair engine.
//!
//! External Markdown-to-LaTeX converters over-escape command markup; this
//! crate walks a directory (or takes a single file) and applies the ordered
//! rewrite-rule table from [`rules`] to every `.tex` file. Files are
//! independent, so the per-file pass runs in parallel by default.
//!
//! Converter output is untrusted input: nothing here assumes the text is
//! well-formed LaTeX, every rewrite is a pure textual rule, and running the
//! engine twice leaves the second pass a no-op.

pub mod rules;

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use rules::{RESIDUAL_PATTERN, apply_all};

/// Errors from the repair engine. Only I/O problems are errors; residual
/// escape matches in validate mode are warnings counted in the session.
#[derive(Debug, Error)]
pub enum RepairError {
    /// The target path does not exist
    #[error("repair target not found: {0}")]
    TargetNotFound(PathBuf),

    /// IO failure on a specific file
    #[error("IO error on {path}: {source}")]
    Io {
        /// The file being read or written
        path: PathBuf,
        /// The underlying failure
        #[source]
        source: std::io::Error,
    },
}

/// Options for one repair invocation.
#[derive(Debug, Clone)]
pub struct RepairOptions {
    /// Compute rewrites and report differences without writing anything
    pub dry_run: bool,
    /// Write the pre-rewrite content to `<name>.backup` before overwriting
    pub backup: bool,
    /// Re-scan rewritten content for residual escape remnants and warn
    pub validate: bool,
    /// Process files in parallel (files share no mutable state)
    pub parallel: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        RepairOptions {
            dry_run: false,
            backup: false,
            validate: false,
            parallel: true,
        }
    }
}

/// Per-file result of a repair pass.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// The file that was scanned
    pub path: PathBuf,
    /// Whether the rewrite differed from the original content
    pub changed: bool,
    /// Backup file written, if any
    pub backup: Option<PathBuf>,
    /// Residual escape matches found in validate mode
    pub residuals: usize,
}

/// Transient tally of one engine invocation; discarded after reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteSession {
    /// Files examined
    pub files_scanned: usize,
    /// Files whose rewrite differed (written unless dry-run)
    pub files_changed: usize,
    /// Backup files written
    pub backups_written: usize,
    /// Residual escape warnings emitted (validate mode)
    pub residual_warnings: usize,
}

/// Repair a single file according to `options`.
pub fn repair_file(path: &Path, options: &RepairOptions) -> Result<FileOutcome, RepairError> {
    let io_err = |source| RepairError::Io {
        path: path.to_path_buf(),
        source,
    };

    let original = fs::read_to_string(path).map_err(io_err)?;
    let rewritten = apply_all(&original);
    let changed = rewritten != original;

    let mut backup = None;
    if changed && !options.dry_run {
        if options.backup {
            let backup_path = backup_path(path);
            fs::write(&backup_path, &original).map_err(io_err)?;
            backup = Some(backup_path);
        }
        fs::write(path, &rewritten).map_err(io_err)?;
        debug!("rewrote {}", path.display());
    } else if changed {
        debug!("would rewrite {} (dry run)", path.display());
    }

    let mut residuals = 0;
    if options.validate {
        for m in RESIDUAL_PATTERN.find_iter(&rewritten) {
            residuals += 1;
            warn!(
                "residual escape remnant in {} at byte {}: {:?}",
                path.display(),
                m.start(),
                m.as_str()
            );
        }
    }

    Ok(FileOutcome {
        path: path.to_path_buf(),
        changed,
        backup,
        residuals,
    })
}

/// Repair a directory tree (every `.tex` file under it) or a single file.
///
/// Returns the session tally plus per-file outcomes in deterministic path
/// order, regardless of parallelism.
pub fn repair_path(
    target: &Path,
    options: &RepairOptions,
) -> Result<(RewriteSession, Vec<FileOutcome>), RepairError> {
    let files = collect_targets(target)?;

    let mut outcomes = if options.parallel {
        files
            .par_iter()
            .map(|path| repair_file(path, options))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        files
            .iter()
            .map(|path| repair_file(path, options))
            .collect::<Result<Vec<_>, _>>()?
    };
    outcomes.sort_by(|a, b| a.path.cmp(&b.path));

    let session = RewriteSession {
        files_scanned: outcomes.len(),
        files_changed: outcomes.iter().filter(|o| o.changed).count(),
        backups_written: outcomes.iter().filter(|o| o.backup.is_some()).count(),
        residual_warnings: outcomes.iter().map(|o| o.residuals).sum(),
    };

    Ok((session, outcomes))
}

fn collect_targets(target: &Path) -> Result<Vec<PathBuf>, RepairError> {
    if target.is_file() {
        return Ok(vec![target.to_path_buf()]);
    }
    if !target.is_dir() {
        return Err(RepairError::TargetNotFound(target.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(target) {
        let entry = entry.map_err(|e| RepairError::Io {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| target.to_path_buf()),
            source: e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("walkdir error")),
        })?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "tex")
        {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Sibling backup path: `chapter.tex` -> `chapter.tex.backup`.
fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".backup");
    path.with_file_name(name)
}
