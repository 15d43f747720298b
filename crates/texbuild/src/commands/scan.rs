/*
 * scan.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Scan command implementation
 */

//! Scan command implementation.
//!
//! Prints the main document's reference lists in first-appearance order,
//! marking references that do not resolve to a file. Mutates nothing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use texbuild_core::scaffold::component_path;
use texbuild_core::scan::{Reference, scan};

/// Arguments for the scan command
#[derive(Debug)]
pub struct ScanArgs {
    /// Main document path
    pub input: PathBuf,
}

/// Execute the scan command
pub fn execute(args: ScanArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read main document: {}", args.input.display()))?;
    let outcome = scan(&text);

    let root = args
        .input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    println!("Style references ({}):", outcome.styles.len());
    print_list(&root, &outcome.styles);
    println!("Content references ({}):", outcome.contents.len());
    print_list(&root, &outcome.contents);

    Ok(())
}

fn print_list(root: &Path, references: &[Reference]) {
    for reference in references {
        let path = component_path(root, reference);
        let marker = if path.is_file() { "" } else { "  [missing]" };
        println!("  {}{}", reference.path, marker);
    }
}
