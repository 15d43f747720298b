/*
 * report.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Build report and compile result types.
 */

//! Build report and compile result types.
//!
//! Both are plain values constructed fresh per run and returned to the
//! caller; nothing here is shared or persisted between runs.

use std::path::PathBuf;

use crate::scan::Reference;

/// Minimum artifact size (bytes) below which a compile is considered failed.
/// Even a one-page PDF comfortably exceeds this; anything smaller is a
/// truncated or bogus artifact.
pub const MIN_ARTIFACT_SIZE: u64 = 1024;

/// Leading bytes every valid artifact must carry.
pub const ARTIFACT_SIGNATURE: &[u8] = b"%PDF-";

/// Structured outcome of one compiler invocation.
///
/// Success requires all four conditions; [`failed_conditions`] reports which
/// ones did not hold so a failure is never just a bare boolean.
///
/// [`failed_conditions`]: CompileResult::failed_conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileResult {
    /// Compiler exited with status zero (false also covers timeout/kill)
    pub exit_ok: bool,
    /// The expected artifact file exists
    pub artifact_exists: bool,
    /// Size of the artifact in bytes (0 when absent)
    pub artifact_size: u64,
    /// Artifact's leading bytes match [`ARTIFACT_SIGNATURE`]
    pub artifact_header_valid: bool,
}

impl CompileResult {
    /// A result with every condition failed (no artifact inspected).
    pub fn failure() -> Self {
        CompileResult {
            exit_ok: false,
            artifact_exists: false,
            artifact_size: 0,
            artifact_header_valid: false,
        }
    }

    /// All four validity conditions hold.
    pub fn success(&self) -> bool {
        self.exit_ok
            && self.artifact_exists
            && self.artifact_size > MIN_ARTIFACT_SIZE
            && self.artifact_header_valid
    }

    /// Names of the conditions that failed, in check order.
    pub fn failed_conditions(&self) -> Vec<&'static str> {
        let mut failed = Vec::new();
        if !self.exit_ok {
            failed.push("compiler exit status");
        }
        if !self.artifact_exists {
            failed.push("artifact missing");
        }
        if self.artifact_size <= MIN_ARTIFACT_SIZE {
            failed.push("artifact too small");
        }
        if !self.artifact_header_valid {
            failed.push("artifact header invalid");
        }
        failed
    }

    fn describe(&self) -> String {
        if self.success() {
            format!("ok ({} bytes)", self.artifact_size)
        } else {
            format!("FAILED ({})", self.failed_conditions().join(", "))
        }
    }
}

/// Full outcome of one `build` run: resolution plus both compile phases.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Number of distinct style references scanned
    pub style_count: usize,
    /// Number of distinct content references scanned
    pub content_count: usize,
    /// References that were missing before resolution, in scan order
    pub missing_before: Vec<Reference>,
    /// Component files generated by this run
    pub generated: Vec<PathBuf>,
    /// Content-suppressed phase result
    pub basic: CompileResult,
    /// Full-document phase result
    pub full: CompileResult,
}

impl BuildReport {
    /// Both compile phases succeeded.
    pub fn overall_ok(&self) -> bool {
        self.basic.success() && self.full.success()
    }

    /// Human-readable summary printed by the CLI.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("Build report\n");
        out.push_str(&format!("  style references:   {}\n", self.style_count));
        out.push_str(&format!("  content references: {}\n", self.content_count));
        out.push_str(&format!(
            "  missing before run: {}\n",
            self.missing_before.len()
        ));
        for path in &self.generated {
            out.push_str(&format!("  generated: {}\n", path.display()));
        }
        out.push_str(&format!("  basic build:  {}\n", self.basic.describe()));
        out.push_str(&format!("  full build:   {}\n", self.full.describe()));
        out.push_str(&format!(
            "  overall: {}\n",
            if self.overall_ok() { "ok" } else { "FAILED" }
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passing() -> CompileResult {
        CompileResult {
            exit_ok: true,
            artifact_exists: true,
            artifact_size: MIN_ARTIFACT_SIZE + 1,
            artifact_header_valid: true,
        }
    }

    #[test]
    fn success_requires_all_four_conditions() {
        assert!(passing().success());

        let mut r = passing();
        r.exit_ok = false;
        assert!(!r.success());
        assert_eq!(r.failed_conditions(), ["compiler exit status"]);

        let mut r = passing();
        r.artifact_exists = false;
        assert!(!r.success());

        let mut r = passing();
        r.artifact_size = MIN_ARTIFACT_SIZE;
        assert!(!r.success(), "size must strictly exceed the threshold");

        let mut r = passing();
        r.artifact_header_valid = false;
        assert!(!r.success());
    }

    #[test]
    fn failure_reports_every_failed_condition() {
        let r = CompileResult::failure();
        assert_eq!(r.failed_conditions().len(), 4);
    }

    #[test]
    fn overall_ok_needs_both_phases() {
        let report = BuildReport {
            style_count: 1,
            content_count: 2,
            missing_before: vec![],
            generated: vec![],
            basic: passing(),
            full: CompileResult::failure(),
        };
        assert!(!report.overall_ok());
        assert!(report.render().contains("full build:   FAILED"));
    }
}
