//! Preprocessor blanking.
//!
//! Runs after comments are gone and trailing whitespace is trimmed, so a
//! directive's last byte is a reliable continuation marker.

use super::Lines;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Stage};
use crate::place::Place;

/// Splits a directive line into its name and argument text.
fn directive(text: &str) -> Option<(&str, &str)> {
    let rest = text.trim_start().strip_prefix('#')?.trim_start();
    let name_end = rest
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(rest.len());
    Some((&rest[..name_end], rest[name_end..].trim()))
}

/// Conditions that can never hold: `0`, `(0)`, `false`, `!1`, `0 && x`, `x && 0`.
fn is_always_false(condition: &str) -> bool {
    let squeezed: String = condition.chars().filter(|c| !c.is_whitespace()).collect();
    matches!(squeezed.as_str(), "0" | "(0)" | "false" | "!1")
        || squeezed.starts_with("0&&")
        || squeezed.starts_with("(0)&&")
        || squeezed.ends_with("&&0")
        || squeezed.ends_with("&&(0)")
}

/// Blanks `#if 0`, always-false `#if`/`#elif`, and `#else` regions through
/// their matching `#endif`.
pub(super) fn blank_dead_conditionals(lines: &mut Lines, sink: &mut dyn DiagnosticSink) {
    let last = lines.line_count();
    let mut idx = 1;

    while idx <= last {
        let dead = match directive(&lines.text[idx]) {
            Some(("if" | "elif", condition)) => is_always_false(condition),
            Some(("else", _)) => true,
            _ => false,
        };
        if !dead {
            idx += 1;
            continue;
        }

        if let Some(end) = matching_endif(lines, idx) {
            blank_range(lines, idx, end);
            idx = end + 1;
        } else {
            let text = &lines.text[idx];
            let name = directive(text).map_or("if", |(name, _)| name);
            let col = text.len() - text.trim_start().len();
            sink.report(Diagnostic::error(
                Stage::Scrub,
                Place::new(idx, col),
                format!("#{name} without matching #endif"),
            ));
            blank_range(lines, idx, last);
            break;
        }
    }
}

fn matching_endif(lines: &Lines, from: usize) -> Option<usize> {
    let mut depth = 0usize;
    for idx in from + 1..=lines.line_count() {
        match directive(&lines.text[idx]) {
            Some(("if" | "ifdef" | "ifndef", _)) => depth += 1,
            Some(("endif", _)) => {
                if depth == 0 {
                    return Some(idx);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

/// Blanks every remaining directive together with its continuation lines.
pub(super) fn blank_directives(lines: &mut Lines) {
    let last = lines.line_count();
    let mut idx = 1;

    while idx <= last {
        if directive(&lines.text[idx]).is_none() {
            idx += 1;
            continue;
        }
        loop {
            let continued = lines.text[idx].ends_with('\\');
            lines.text[idx].clear();
            idx += 1;
            if !continued || idx > last {
                break;
            }
        }
    }
}

fn blank_range(lines: &mut Lines, first: usize, last: usize) {
    for text in &mut lines.text[first..=last] {
        text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_directives() {
        assert_eq!(directive("#if 0"), Some(("if", "0")));
        assert_eq!(directive("  #  ifdef FOO"), Some(("ifdef", "FOO")));
        assert_eq!(directive("#endif"), Some(("endif", "")));
        assert_eq!(directive("#"), Some(("", "")));
        assert_eq!(directive("int x; // #if"), None);
    }

    #[test]
    fn always_false_conditions() {
        assert!(is_always_false("0"));
        assert!(is_always_false(" ( 0 ) "));
        assert!(is_always_false("false"));
        assert!(is_always_false("0 && defined(FOO)"));
        assert!(is_always_false("defined(FOO) && 0"));
        assert!(!is_always_false("1"));
        assert!(!is_always_false("defined(FOO)"));
        assert!(!is_always_false("10"));
        assert!(!is_always_false("0 || FOO"));
    }
}
