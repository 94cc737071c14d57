//! Rule to report bracket structure errors.
//!
//! # Rationale
//!
//! Every later check relies on the group tree. An unmatched or mismatched
//! bracket means the tree around it was recovered heuristically, and any
//! finding inside that region is suspect.
//!
//! # Detected Patterns
//!
//! - A `)` or `}` with no opener
//! - A `(` closed by `}`, or a stray `)` inside braces
//! - A bracket still open at end of file

use cxxlint_core::{FileContext, Rule, Severity, SourceFile, Stage, Violation};

use crate::stage::stage_violations;

/// Rule code for bracket-structure.
pub const CODE: &str = "CX001";

/// Rule name for bracket-structure.
pub const NAME: &str = "bracket-structure";

/// Reports unmatched, mismatched and unclosed brackets.
#[derive(Debug, Clone, Default)]
pub struct BracketStructure;

impl BracketStructure {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for BracketStructure {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Reports unmatched, mismatched and unclosed brackets"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &FileContext, source: &SourceFile) -> Vec<Violation> {
        stage_violations(ctx, source, Stage::Build, CODE, NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxxlint_core::ScrubOptions;
    use std::path::Path;

    fn check_code(code: &str) -> Vec<Violation> {
        let ctx = FileContext::new(Path::new("/p/test.cpp"), code, Path::new("/p"));
        let source = SourceFile::analyze(code, ctx.kind, &ScrubOptions::default());
        BracketStructure::new().check(&ctx, &source)
    }

    #[test]
    fn test_well_formed_file() {
        assert!(check_code("int f() { return (1); }\n").is_empty());
    }

    #[test]
    fn test_reports_each_problem() {
        let violations = check_code("void g() { h(1; }\n)\n");
        let report: Vec<String> = violations.iter().map(ToString::to_string).collect();
        insta::assert_snapshot!(report.join("\n"), @r###"
        test.cpp:1:17: error [CX001] '}' closes '(' opened at 1:13
        test.cpp:2:1: error [CX001] unmatched ')'
        "###);
    }

    #[test]
    fn test_reports_early_eof() {
        let violations = check_code("class A {\n  void f();\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 1);
        assert_eq!(violations[0].location.column, 9);
        assert!(violations[0].message.contains("end of file"));
    }

    #[test]
    fn test_ignores_brackets_in_literals_and_comments() {
        assert!(check_code("const char* s = \"(\"; // }\nchar c = '{';\n").is_empty());
    }
}
