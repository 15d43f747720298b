/*
 * sanitize.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Identifier sanitization for generated artifacts.
 */

//! Identifier sanitization for generated artifacts.
//!
//! Component paths like `content/03-results` are not usable as-is in
//! cross-reference labels or macro names, so scaffolded files derive a safe
//! identifier from them. The derivation is total (never fails), deterministic,
//! and idempotent: sanitizing an already-sanitized identifier is a no-op.

/// Identifier used when sanitization strips every character.
pub const FALLBACK_IDENTIFIER: &str = "section";

/// Prefix applied when the sanitized result would start with a digit.
const DIGIT_PREFIX: &str = "sec";

/// Derive a safe identifier from an arbitrary string.
///
/// Keeps only ASCII letters and digits, prepends [`DIGIT_PREFIX`] if the
/// result starts with a digit, and falls back to [`FALLBACK_IDENTIFIER`]
/// when nothing remains. The result is always non-empty and starts with a
/// letter.
pub fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    if cleaned.is_empty() {
        return FALLBACK_IDENTIFIER.to_string();
    }

    if cleaned.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("{DIGIT_PREFIX}{cleaned}")
    } else {
        cleaned
    }
}
