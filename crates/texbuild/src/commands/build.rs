/*
 * build.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Build command implementation
 */

//! Build command implementation.
//!
//! Runs the missing-dependency resolver and the two-phase build validator,
//! prints the build report, and exits non-zero when the report is not OK.
//! A restoration failure aborts with its own fatal message; ordinary compile
//! failures are part of the report and never abort the run.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use texbuild_core::{LatexTool, check_document};

/// Arguments for the build command
#[derive(Debug)]
pub struct BuildArgs {
    /// Main document path
    pub input: PathBuf,
    /// Explicit compiler binary, bypassing discovery
    pub latex: Option<PathBuf>,
    /// Per-phase compile timeout in seconds
    pub timeout: u64,
}

/// Execute the build command
pub fn execute(args: BuildArgs) -> Result<()> {
    if !args.input.is_file() {
        anyhow::bail!("Main document does not exist: {}", args.input.display());
    }

    let timeout = Duration::from_secs(args.timeout);
    let tool = match args.latex {
        Some(program) => LatexTool::new(program, timeout),
        None => LatexTool::discover(timeout)?,
    };
    info!("using LaTeX compiler: {}", tool.program().display());

    // No extra context here: a RestorationFailed must surface its own
    // unambiguous top-level message.
    let report = check_document(&args.input, &tool)?;

    print!("{}", report.render());

    if !report.overall_ok() {
        std::process::exit(1);
    }
    Ok(())
}
