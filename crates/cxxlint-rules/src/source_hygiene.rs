//! Rule to report scrubber anomalies.
//!
//! # Detected Patterns
//!
//! - Tab characters and lines over the configured length
//! - Unterminated string or character literals
//! - A stray `*/`, or a block comment still open at end of file
//! - A blanked conditional region with no `#endif`
//!
//! The line length limit is a scrubber option (`[scrub] max_line_length`),
//! not a rule option.

use cxxlint_core::{FileContext, Rule, Severity, SourceFile, Stage, Violation};

use crate::stage::stage_violations;

/// Rule code for source-hygiene.
pub const CODE: &str = "CX003";

/// Rule name for source-hygiene.
pub const NAME: &str = "source-hygiene";

/// Reports lexical anomalies found while scrubbing.
#[derive(Debug, Clone)]
pub struct SourceHygiene {
    /// Skip test drivers.
    pub allow_in_tests: bool,
}

impl Default for SourceHygiene {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceHygiene {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allow_in_tests: false,
        }
    }

    /// Sets whether to skip test drivers.
    #[must_use]
    pub fn allow_in_tests(mut self, allow: bool) -> Self {
        self.allow_in_tests = allow;
        self
    }
}

impl Rule for SourceHygiene {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Reports tabs, long lines, unterminated literals and comments"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, source: &SourceFile) -> Vec<Violation> {
        if self.allow_in_tests && ctx.kind.is_test() {
            return Vec::new();
        }
        stage_violations(ctx, source, Stage::Scrub, CODE, NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxxlint_core::ScrubOptions;
    use std::path::Path;

    fn check_with(code: &str, options: &ScrubOptions) -> Vec<Violation> {
        let ctx = FileContext::new(Path::new("/p/a.cpp"), code, Path::new("/p"));
        let source = SourceFile::analyze(code, ctx.kind, options);
        SourceHygiene::new().check(&ctx, &source)
    }

    #[test]
    fn test_tabs_and_long_lines() {
        let options = ScrubOptions {
            max_line_length: 20,
            ..ScrubOptions::default()
        };
        let code = "int a;\n\tint b;\nint some_long_name_here = 1;\n";
        let violations = check_with(code, &options);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].location.line, 2);
        assert_eq!(violations[0].message, "tab character");
        assert_eq!(violations[1].location.line, 3);
        assert!(violations[1].message.contains("(max: 20)"));
        assert!(violations.iter().all(|v| v.severity == Severity::Warning));
    }

    #[test]
    fn test_missing_endif_is_error() {
        let violations = check_with("#if 0\nint a;\n", &ScrubOptions::default());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Error);
        assert!(violations[0].message.contains("without matching #endif"));
    }

    #[test]
    fn test_clean_source() {
        let code = "// comment\nint x = 1;  /* note */\nconst char* s = \"a\\\"b\";\n";
        assert!(check_with(code, &ScrubOptions::default()).is_empty());
    }
}
