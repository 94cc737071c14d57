//! Rule to limit the length of routine bodies.
//!
//! # Rationale
//!
//! Long routines are hard to review and to test. This rule counts the
//! physical lines of each outermost routine body, brace lines included.
//! Lambdas nested in a routine count towards that routine only.
//!
//! # Configuration
//!
//! - `max_lines`: Maximum lines in a routine body (default: 150)
//! - `allow_in_tests`: Skip test drivers (default: true)

use cxxlint_core::{
    FileContext, GroupId, GroupType, Label, Rule, RuleConfig, Severity, SourceFile, Suggestion,
    Violation,
};

/// Rule code for routine-length.
pub const CODE: &str = "CX004";

/// Rule name for routine-length.
pub const NAME: &str = "routine-length";

const DEFAULT_MAX_LINES: usize = 150;

/// Limits the number of lines in a routine body.
#[derive(Debug, Clone)]
pub struct RoutineLength {
    /// Maximum lines in a routine body.
    pub max_lines: usize,
    /// Skip test drivers.
    pub allow_in_tests: bool,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for RoutineLength {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutineLength {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
            allow_in_tests: true,
            severity: Severity::Warning,
        }
    }

    /// Creates a rule from its `[rules.routine-length]` options.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        let defaults = Self::new();
        let max_lines = usize::try_from(config.get_int("max_lines", 0))
            .ok()
            .filter(|&n| n > 0)
            .unwrap_or(defaults.max_lines);
        let allow_in_tests = config.get_bool("allow_in_tests", defaults.allow_in_tests);
        defaults.max_lines(max_lines).allow_in_tests(allow_in_tests)
    }

    /// Sets the maximum number of lines.
    #[must_use]
    pub fn max_lines(mut self, max: usize) -> Self {
        self.max_lines = max;
        self
    }

    /// Sets whether to skip test drivers.
    #[must_use]
    pub fn allow_in_tests(mut self, allow: bool) -> Self {
        self.allow_in_tests = allow;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for RoutineLength {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Limits the number of lines in a routine body"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, source: &SourceFile) -> Vec<Violation> {
        if self.allow_in_tests && ctx.kind.is_test() {
            return Vec::new();
        }

        let mut violations = Vec::new();
        source.walk(|id, group, kind| {
            if kind != GroupType::RoutineBody || inside_routine(source, id) {
                return;
            }
            let lines = group.line_span();
            if lines <= self.max_lines {
                return;
            }

            let subject = routine_name(source, id)
                .map_or_else(|| "Routine body".to_string(), |name| format!("Routine `{name}`"));
            violations.push(
                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    ctx.location(group.open()),
                    format!(
                        "{subject} has {lines} lines (max: {})",
                        self.max_lines
                    ),
                )
                .with_label(Label::new(ctx.location(group.close()), "body ends here"))
                .with_suggestion(Suggestion::new(
                    "Extract helper routines for the independent steps",
                )),
            );
        });
        violations
    }
}

/// Whether some ancestor of `id` is itself a routine body.
fn inside_routine(source: &SourceFile, id: GroupId) -> bool {
    let tree = source.tree();
    std::iter::successors(tree.parent(id), |&p| tree.parent(p))
        .any(|p| source.kind(p) == GroupType::RoutineBody)
}

/// Name before the parameter list that precedes a routine body.
fn routine_name(source: &SourceFile, body: GroupId) -> Option<String> {
    let tree = source.tree();
    let open = tree.get(body).open();
    let parent = tree.parent(body)?;
    let params = tree
        .children(parent)
        .rev()
        .find(|&c| tree.get(c).close() < open)?;
    let group = tree.get(params);
    (group.is_paren() && !group.prev_word().is_empty()).then(|| group.prev_word().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxxlint_core::{Config, ScrubOptions};
    use std::fmt::Write;
    use std::path::Path;

    fn routine(name: &str, body_lines: usize) -> String {
        let mut code = format!("int {name}(int x)\n{{\n");
        for i in 0..body_lines {
            let _ = writeln!(code, "    x += {i};");
        }
        code.push_str("    return x;\n}\n");
        code
    }

    fn check_at(path: &str, code: &str, rule: &RoutineLength) -> Vec<Violation> {
        let ctx = FileContext::new(Path::new(path), code, Path::new("/p"));
        let source = SourceFile::analyze(code, ctx.kind, &ScrubOptions::default());
        rule.check(&ctx, &source)
    }

    #[test]
    fn test_detects_long_routine() {
        let code = format!("{}{}", routine("short_one", 3), routine("long_one", 10));
        let violations = check_at("/p/a.cpp", &code, &RoutineLength::new().max_lines(8));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "Routine `long_one` has 13 lines (max: 8)");
        assert_eq!(violations[0].location.line, 9);
        assert_eq!(violations[0].severity, Severity::Warning);
        assert_eq!(violations[0].labels[0].location.line, 21);
    }

    #[test]
    fn test_nested_lambda_is_not_reported_twice() {
        let mut code = String::from("void f() {\n  auto g = [](int y) {\n");
        for _ in 0..6 {
            code.push_str("    ++y;\n");
        }
        code.push_str("    return y;\n  };\n}\n");
        let violations = check_at("/p/a.cpp", &code, &RoutineLength::new().max_lines(5));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 1);
    }

    #[test]
    fn test_skips_test_drivers_by_default() {
        let code = routine("big_case", 10);
        assert!(check_at("/p/a.t.cpp", &code, &RoutineLength::new().max_lines(5)).is_empty());
        let strict = RoutineLength::new().max_lines(5).allow_in_tests(false);
        assert_eq!(check_at("/p/a.t.cpp", &code, &strict).len(), 1);
    }

    #[test]
    fn test_from_config() {
        let config = Config::parse(
            "[rules.routine-length]\nmax_lines = 40\nallow_in_tests = false\n",
        )
        .unwrap();
        let rule = RoutineLength::from_config(&config.rules[NAME]);
        assert_eq!(rule.max_lines, 40);
        assert!(!rule.allow_in_tests);

        let rule = RoutineLength::from_config(&RuleConfig::default());
        assert_eq!(rule.max_lines, DEFAULT_MAX_LINES);
    }
}
