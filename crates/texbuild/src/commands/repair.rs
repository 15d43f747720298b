/*
 * repair.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Repair command implementation
 */

//! Repair command implementation.
//!
//! Runs the escaping repair engine over a directory (or single file) of
//! converter output, printing each changed file and a final tally. Only I/O
//! errors fail the command; residual-escape warnings in validate mode do
//! not.

use std::path::PathBuf;

use anyhow::Result;

use texbuild_repair::{RepairOptions, repair_path};

/// Arguments for the repair command
#[derive(Debug)]
pub struct RepairArgs {
    /// Directory tree or single .tex file
    pub target: PathBuf,
    /// Report differences without writing
    pub dry_run: bool,
    /// Write backups before overwriting
    pub backup: bool,
    /// Warn about residual escape remnants
    pub validate: bool,
    /// Disable the parallel per-file pass
    pub sequential: bool,
}

/// Execute the repair command
pub fn execute(args: RepairArgs) -> Result<()> {
    let options = RepairOptions {
        dry_run: args.dry_run,
        backup: args.backup,
        validate: args.validate,
        parallel: !args.sequential,
    };

    let (session, outcomes) = repair_path(&args.target, &options)?;

    for outcome in &outcomes {
        if outcome.changed {
            let note = if args.dry_run { "would change" } else { "rewritten" };
            println!("{} ({})", outcome.path.display(), note);
        }
    }

    println!(
        "\nProcessed {} files: {} changed{}{}",
        session.files_scanned,
        session.files_changed,
        if args.backup {
            format!(", {} backups written", session.backups_written)
        } else {
            String::new()
        },
        if args.validate {
            format!(", {} residual warnings", session.residual_warnings)
        } else {
            String::new()
        },
    );

    Ok(())
}
