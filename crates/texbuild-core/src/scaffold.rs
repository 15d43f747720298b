/*
 * scaffold.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Placeholder component generation for missing references.
 */

//! Placeholder component generation for missing references.
//!
//! When the resolver finds a reference with no file behind it, this module
//! synthesizes a minimal compilable placeholder so the build test can run,
//! plus a short companion notes file telling a human author what to do next.
//! Generated content is deliberately small: a style gets a package header and
//! one placeholder macro, a content file gets a section with a stable label
//! and placeholder prose.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CheckError;
use crate::sanitize::sanitize;
use crate::scan::{RefKind, Reference};

/// Files written for one scaffolded reference.
#[derive(Debug, Clone)]
pub struct ScaffoldOutput {
    /// The generated component file
    pub component: PathBuf,
    /// The companion completion-guidance file
    pub notes: PathBuf,
}

/// Render the placeholder body for a reference.
pub fn render(reference: &Reference) -> String {
    match reference.kind {
        RefKind::Style => style_template(&reference.path),
        RefKind::Content => content_template(&reference.path),
    }
}

fn style_template(path: &str) -> String {
    let id = sanitize(path);
    // LaTeX macro names may only contain letters, so digits that survived
    // sanitization are dropped from the macro name.
    let macro_name: String = id.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    let macro_name = if macro_name.is_empty() {
        "placeholder".to_string()
    } else {
        macro_name
    };

    format!(
        "\\NeedsTeXFormat{{LaTeX2e}}\n\
         \\ProvidesPackage{{{path}}}[2025/01/01 v0.1 Placeholder package {id}]\n\
         \n\
         % Placeholder package generated by texbuild.\n\
         % Replace the macro below with the real definitions for this package.\n\
         \\newcommand{{\\{macro_name}Placeholder}}{{\\textit{{{id} placeholder}}}}\n\
         \n\
         \\endinput\n"
    )
}

fn content_template(path: &str) -> String {
    let id = sanitize(path);
    format!(
        "% Placeholder content generated by texbuild.\n\
         % Replace this section with the real text for this component.\n\
         \\section{{{id} (placeholder)}}\n\
         \\label{{sec:{id}}}\n\
         \n\
         This section is a generated placeholder. The reference\n\
         \\texttt{{{escaped}}} in the main document pointed to a file that did\n\
         not exist at scan time.\n",
        escaped = path.replace('_', "\\_"),
    )
}

fn notes_template(reference: &Reference, component: &Path) -> String {
    let kind = match reference.kind {
        RefKind::Style => "style package",
        RefKind::Content => "content section",
    };
    format!(
        "Placeholder {kind} generated for reference '{path}'.\n\
         \n\
         Follow-up actions:\n\
         1. Replace the placeholder body in {component} with real content.\n\
         2. Keep the declared name/label in sync with the main document.\n\
         3. Re-run `texbuild build` to confirm the document still compiles.\n\
         4. Delete this notes file once the component is written.\n",
        path = reference.path,
        component = component.display(),
    )
}

/// Compute the on-disk path for a reference, appending the kind's default
/// extension when the reference carries none.
pub fn component_path(root: &Path, reference: &Reference) -> PathBuf {
    let path = root.join(&reference.path);
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(reference.kind.extension())
    }
}

/// Write the placeholder component and its companion notes file.
///
/// Parent directories are created as needed. Must only be called for
/// references that do not already resolve to a file; an existing component
/// is never overwritten by the resolver.
pub fn write_scaffold(root: &Path, reference: &Reference) -> Result<ScaffoldOutput, CheckError> {
    let component = component_path(root, reference);
    if let Some(parent) = component.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&component, render(reference))?;

    let notes = notes_path(&component);
    fs::write(&notes, notes_template(reference, &component))?;

    Ok(ScaffoldOutput { component, notes })
}

/// Companion notes file path: `content/b.tex` -> `content/b-notes.txt`.
fn notes_path(component: &Path) -> PathBuf {
    let stem = component
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "component".to_string());
    component.with_file_name(format!("{stem}-notes.txt"))
}
