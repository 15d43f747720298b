/*
 * resolve.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Missing dependency resolution for the main document.
 */

//! Missing dependency resolution.
//!
//! Scans the main document and guarantees that every referenced component
//! resolves to an existing file, scaffolding placeholders for the missing
//! ones. Generation is synchronous and local, so no re-check is needed
//! within one invocation; running [`resolve`] twice in a row generates
//! nothing on the second run.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::CheckError;
use crate::scaffold::{component_path, write_scaffold};
use crate::scan::{Reference, ScanOutcome, scan};

/// Result of one resolver invocation.
#[derive(Debug, Clone)]
pub struct ResolveOutcome {
    /// The scan the resolver acted on
    pub scan: ScanOutcome,
    /// References that had no file before this run, in scan order
    pub missing_before: Vec<Reference>,
    /// Component files written by this run
    pub generated: Vec<PathBuf>,
}

/// Scan `main_doc` and scaffold every missing referenced component.
///
/// After this returns, every scanned reference resolves to an existing file
/// under the main document's directory.
pub fn resolve(main_doc: &Path) -> Result<ResolveOutcome, CheckError> {
    let root = main_doc
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let text = fs::read_to_string(main_doc)?;
    let outcome = scan(&text);

    let mut missing_before = Vec::new();
    let mut generated = Vec::new();

    for reference in outcome.styles.iter().chain(outcome.contents.iter()) {
        let path = component_path(&root, reference);
        if path.is_file() {
            debug!("reference '{}' resolves to {}", reference.path, path.display());
            continue;
        }

        missing_before.push(reference.clone());
        let written = write_scaffold(&root, reference)?;
        info!(
            "scaffolded missing component {} (notes: {})",
            written.component.display(),
            written.notes.display()
        );
        generated.push(written.component);
    }

    Ok(ResolveOutcome {
        scan: outcome,
        missing_before,
        generated,
    })
}
