/*
 * rules.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The ordered rewrite-rule table.
 */

//! The ordered rewrite-rule table.
//!
//! Markdown-to-LaTeX converters escape backslash commands into forms like
//! `\textbackslash{}section\textbackslash{}`. Repair applies two rule
//! classes in a fixed order:
//!
//! 1. **CommandFix** rules restore escaped commands to their normal form.
//! 2. **Cleanup** rules repair residual artifact classes: doubled escape
//!    sequences, escaped brace pairs, stray whitespace between a restored
//!    command and its argument.
//!
//! The ordering is load-bearing: cleanup rules assume command rules have
//! already run (the stray-whitespace rule only matches a restored `\cmd`,
//! and the brace rule must not fire inside still-escaped command text).
//! Each rule is applied to a fixpoint, so a rewrite that uncovers a fresh
//! match of the same rule is consumed in the same pass; this is what makes
//! repair idempotent per-rule, not just in aggregate.

use regex::Regex;
use std::sync::LazyLock;

/// Classification of a rewrite rule; CommandFix rules always run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleClass {
    /// Restores one escaped markup command to its normal form
    CommandFix,
    /// Repairs a residual artifact class left after command restoration
    Cleanup,
}

/// One pattern/replacement pair in the ordered table. Stateless; never
/// mutated between files.
pub struct RewriteRule {
    /// Short name used in logs and warnings
    pub name: &'static str,
    /// CommandFix or Cleanup
    pub class: RuleClass,
    pattern: Regex,
    replacement: &'static str,
}

impl RewriteRule {
    fn new(name: &'static str, class: RuleClass, pattern: &str, replacement: &'static str) -> Self {
        RewriteRule {
            name,
            class,
            pattern: Regex::new(pattern).expect("Invalid rewrite rule pattern"),
            replacement,
        }
    }

    /// Apply this rule to a fixpoint.
    ///
    /// A plain `replace_all` is not enough: a replacement can expose a new
    /// match starting before the scan position (e.g. collapsing one escape
    /// layer reveals another), and leaving it behind would break the
    /// idempotence guarantee however deeply the input is nested. Every
    /// rule's replacement is strictly shorter than its match, so each
    /// changed iteration strictly shrinks the string and the loop
    /// terminates.
    pub fn apply(&self, input: &str) -> String {
        let mut current = input.to_string();
        loop {
            let next = self
                .pattern
                .replace_all(&current, self.replacement)
                .into_owned();
            if next == current {
                return current;
            }
            current = next;
        }
    }

}

/// The rule table, in application order: all CommandFix rules, then all
/// Cleanup rules.
pub static RULES: LazyLock<Vec<RewriteRule>> = LazyLock::new(|| {
    vec![
        // An escaped command wrapped on both sides:
        // \textbackslash{}section\textbackslash{} -> \section
        RewriteRule::new(
            "wrapped-command",
            RuleClass::CommandFix,
            r"\\textbackslash\{\}([A-Za-z]+)\\textbackslash\{\}",
            "\\$1",
        ),
        // An escaped command followed by its name:
        // \textbackslash{}section -> \section
        RewriteRule::new(
            "bare-command",
            RuleClass::CommandFix,
            r"\\textbackslash\{\}([A-Za-z]+)",
            "\\${1}",
        ),
        // Doubled escape sequence standing for a literal \\ (line break)
        RewriteRule::new(
            "doubled-escape",
            RuleClass::Cleanup,
            r"\\textbackslash\{\}\\textbackslash\{\}",
            "\\\\",
        ),
        // Escaped brace pair around an argument: \{text\} -> {text}
        RewriteRule::new(
            "escaped-brace-pair",
            RuleClass::Cleanup,
            r"\\\{([^{}]*)\\\}",
            "{${1}}",
        ),
        // Stray whitespace between a restored command and its argument
        RewriteRule::new(
            "stray-space-before-arg",
            RuleClass::Cleanup,
            r"(\\[A-Za-z]+)[ \t]+\{",
            "${1}{",
        ),
    ]
});

/// Residual escape remnant that no rule should leave behind for command
/// text. Used by validate mode; matching is a warning, not an error,
/// because a lone `\textbackslash{}` can legitimately stand for a literal
/// backslash in prose.
pub static RESIDUAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\textbackslash(?:\{\})?").expect("Invalid residual pattern")
});

/// Apply the whole table in order.
pub fn apply_all(input: &str) -> String {
    let mut current = input.to_string();
    for rule in RULES.iter() {
        current = rule.apply(&current);
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_partitioned_commandfix_first() {
        let first_cleanup = RULES
            .iter()
            .position(|r| r.class == RuleClass::Cleanup)
            .expect("table has cleanup rules");
        assert!(
            RULES[..first_cleanup]
                .iter()
                .all(|r| r.class == RuleClass::CommandFix)
        );
        assert!(
            RULES[first_cleanup..]
                .iter()
                .all(|r| r.class == RuleClass::Cleanup)
        );
    }

    #[test]
    fn wrapped_command_restored() {
        // The canonical converter artifact
        let out = apply_all("\\textbackslash{}section\\textbackslash{}");
        assert_eq!(out, "\\section");
    }

    #[test]
    fn bare_command_restored() {
        assert_eq!(
            apply_all("\\textbackslash{}textbf{bold} text"),
            "\\textbf{bold} text"
        );
    }

    #[test]
    fn doubled_escape_collapsed() {
        assert_eq!(apply_all("line one\\textbackslash{}\\textbackslash{}\nrest"), "line one\\\\\nrest");
    }

    #[test]
    fn escaped_brace_pairs_unescaped() {
        assert_eq!(apply_all("\\textbackslash{}emph\\{important\\}"), "\\emph{important}");
        assert_eq!(apply_all("\\{a\\} \\{b\\}"), "{a} {b}");
    }

    #[test]
    fn stray_space_removed_only_after_command_restore() {
        assert_eq!(apply_all("\\textbackslash{}section  {Title}"), "\\section{Title}");
        // Plain prose whitespace before a brace (no command) is untouched
        assert_eq!(apply_all("word {grouping}"), "word {grouping}");
    }

    #[test]
    fn each_rule_is_idempotent() {
        let corpus = [
            "\\textbackslash{}section\\textbackslash{}",
            "\\textbackslash{}textbackslash{}abc",
            "\\textbackslash{}\\textbackslash{}",
            "\\{nested\\} \\{pair\\}",
            "\\cmd   {arg}",
            "plain prose with % comment",
            "",
        ];
        for rule in RULES.iter() {
            for input in corpus {
                let once = rule.apply(input);
                let twice = rule.apply(&once);
                assert_eq!(twice, once, "rule '{}' not idempotent on {input:?}", rule.name);
            }
        }
    }

    #[test]
    fn deeply_nested_escapes_resolve_in_one_pass() {
        // Each conversion round re-escapes the previous round's leading
        // backslash, yielding arbitrarily deep nesting. One repair pass must
        // fully unwind it; a second pass must be a no-op.
        let input = format!("\\textbackslash{{}}{}abc", "textbackslash{}".repeat(19));
        let once = apply_all(&input);
        assert_eq!(once, "\\abc");
        assert_eq!(apply_all(&once), once);
    }

    #[test]
    fn whole_table_is_idempotent() {
        let corpus = [
            "\\textbackslash{}section\\textbackslash{} and \\{braces\\}",
            "\\textbackslash{}textbackslash{}deep",
            "untouched text\n\\usepackage{styles/x}\n",
        ];
        for input in corpus {
            let once = apply_all(input);
            assert_eq!(apply_all(&once), once, "table not idempotent on {input:?}");
        }
    }

    #[test]
    fn residual_pattern_flags_leftovers() {
        assert!(RESIDUAL_PATTERN.is_match("a \\textbackslash{} b"));
        assert!(RESIDUAL_PATTERN.is_match("a \\textbackslash b"));
        assert!(!RESIDUAL_PATTERN.is_match("\\section{clean}"));
    }
}
