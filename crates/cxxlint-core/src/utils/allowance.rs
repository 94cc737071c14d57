//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! // cxxlint: allow(routine-length) reason="generated dispatch table"
//! ```
//!
//! A directive applies to its own line and to the line below it.

use std::collections::HashSet;

use crate::lines::Lines;

/// Result of checking for allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
pub struct AllowDirective {
    /// Rule names that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

/// Checks the line comments of `line` and the line above for a directive
/// naming `rule_name` (or `all`).
///
/// Only real `//` comments are considered; text inside string literals
/// never matches.
#[must_use]
pub fn check_allow_with_reason(lines: &Lines, line: usize, rule_name: &str) -> AllowCheck {
    for check_line in [line.saturating_sub(1), line] {
        if check_line == 0 || check_line > lines.line_count() {
            continue;
        }
        let Some(col) = lines.comment_col(check_line) else {
            continue;
        };
        let body = lines.raw(check_line).get(col + 2..).unwrap_or("");
        if let Some(directive) = parse_allow_directive(body) {
            if directive.rules.contains(rule_name) || directive.rules.contains("all") {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Parses an allowance directive from the text following `//`.
fn parse_allow_directive(comment: &str) -> Option<AllowDirective> {
    let comment = comment.trim_start_matches('/').trim();

    let directive = comment.strip_prefix("cxxlint:")?.trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .map(str::trim)
        .and_then(|r| r.strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()));

    Some(AllowDirective { rules, reason })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FileKind;
    use crate::lines::ScrubOptions;

    fn lines(source: &str) -> Lines {
        Lines::scrub(
            source,
            FileKind::Implementation,
            &ScrubOptions::default(),
            &mut Vec::new(),
        )
    }

    #[test]
    fn test_parse_allow_directive() {
        let directive = parse_allow_directive(" cxxlint: allow(routine-length)").unwrap();
        assert!(directive.rules.contains("routine-length"));
        assert!(directive.reason.is_none());
    }

    #[test]
    fn test_parse_allow_directive_with_reason() {
        let directive =
            parse_allow_directive(" cxxlint: allow(nesting-depth) reason=\"state machine\"")
                .unwrap();
        assert!(directive.rules.contains("nesting-depth"));
        assert_eq!(directive.reason, Some("state machine".to_string()));
    }

    #[test]
    fn test_parse_multiple_rules() {
        let directive = parse_allow_directive(" cxxlint: allow(rule1, rule2, rule3)").unwrap();
        assert_eq!(directive.rules.len(), 3);
        assert!(directive.rules.contains("rule2"));
    }

    #[test]
    fn test_rejects_other_tools() {
        assert!(parse_allow_directive(" NOLINT(readability)").is_none());
        assert!(parse_allow_directive(" cxxlint: allow()").is_none());
    }

    #[test]
    fn directive_on_line_above() {
        let l = lines("void f() {\n  // cxxlint: allow(strange-context)\n  FOO {\n  }\n}");
        assert!(check_allow_with_reason(&l, 3, "strange-context").is_allowed());
        assert!(!check_allow_with_reason(&l, 3, "routine-length").is_allowed());
        assert!(!check_allow_with_reason(&l, 4, "strange-context").is_allowed());
    }

    #[test]
    fn trailing_directive_with_reason() {
        let l = lines("int g() {  // cxxlint: allow(all) reason=\"legacy\"\n}");
        let check = check_allow_with_reason(&l, 1, "routine-length");
        assert_eq!(check.reason(), Some("legacy"));
    }

    #[test]
    fn directive_text_inside_string_is_ignored() {
        let l = lines("const char* s = \"// cxxlint: allow(all)\";");
        assert_eq!(check_allow_with_reason(&l, 1, "x"), AllowCheck::Denied);
    }
}
