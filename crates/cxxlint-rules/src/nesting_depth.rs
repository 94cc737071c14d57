//! Rule to limit how deeply code blocks nest inside a routine.
//!
//! # Rationale
//!
//! Deep nesting of `if`, loop and `switch` bodies hides the main path of
//! a routine. Only code bodies count: a lambda starts a fresh routine.
//! The first block past the limit is reported; blocks nested inside it are
//! not reported again.
//!
//! # Configuration
//!
//! - `max_depth`: Maximum nested code bodies in a routine (default: 5)
//! - `allow_in_tests`: Skip test drivers (default: false)

use cxxlint_core::{
    FileContext, GroupId, GroupType, Rule, RuleConfig, Severity, SourceFile, Suggestion,
    Violation,
};

/// Rule code for nesting-depth.
pub const CODE: &str = "CX005";

/// Rule name for nesting-depth.
pub const NAME: &str = "nesting-depth";

const DEFAULT_MAX_DEPTH: usize = 5;

/// Limits nesting of code bodies inside a routine body.
#[derive(Debug, Clone)]
pub struct NestingDepth {
    /// Maximum nested code bodies.
    pub max_depth: usize,
    /// Skip test drivers.
    pub allow_in_tests: bool,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NestingDepth {
    fn default() -> Self {
        Self::new()
    }
}

impl NestingDepth {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_in_tests: false,
            severity: Severity::Warning,
        }
    }

    /// Creates a rule from its `[rules.nesting-depth]` options.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        let defaults = Self::new();
        let max_depth = usize::try_from(config.get_int("max_depth", 0))
            .ok()
            .filter(|&n| n > 0)
            .unwrap_or(defaults.max_depth);
        let allow_in_tests = config.get_bool("allow_in_tests", defaults.allow_in_tests);
        defaults.max_depth(max_depth).allow_in_tests(allow_in_tests)
    }

    /// Sets the maximum depth.
    #[must_use]
    pub fn max_depth(mut self, max: usize) -> Self {
        self.max_depth = max;
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

impl Rule for NestingDepth {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Limits nesting of code blocks inside a routine"
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
            if kind != GroupType::CodeBody {
                return;
            }
            let Some(depth) = code_depth(source, id) else {
                return;
            };
            if depth != self.max_depth + 1 {
                return;
            }
            violations.push(
                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    ctx.location(group.open()),
                    format!(
                        "Code block is nested {depth} levels deep (max: {})",
                        self.max_depth
                    ),
                )
                .with_suggestion(Suggestion::new(
                    "Return early or move the inner block into its own routine",
                )),
            );
        });
        violations
    }
}

/// Number of code bodies from `id` up to its routine body, `id` included.
/// `None` when the block is not inside a routine body.
fn code_depth(source: &SourceFile, id: GroupId) -> Option<usize> {
    let tree = source.tree();
    let mut depth = 0;
    let mut current = Some(id);
    while let Some(g) = current {
        match source.kind(g) {
            GroupType::RoutineBody => return Some(depth),
            GroupType::CodeBody => depth += 1,
            _ => {}
        }
        current = tree.parent(g);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxxlint_core::{Config, ScrubOptions};
    use std::path::Path;

    const DEEP: &str = "\
void f(int a) {
  if (a) {
    while (a) {
      for (;;) {
        if (a > 2) {
          --a;
        }
      }
    }
  }
}
";

    fn check(code: &str, rule: &NestingDepth) -> Vec<Violation> {
        let ctx = FileContext::new(Path::new("/p/a.cpp"), code, Path::new("/p"));
        let source = SourceFile::analyze(code, ctx.kind, &ScrubOptions::default());
        rule.check(&ctx, &source)
    }

    #[test]
    fn test_reports_first_block_past_limit() {
        let violations = check(DEEP, &NestingDepth::new().max_depth(2));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 4);
        assert_eq!(
            violations[0].message,
            "Code block is nested 3 levels deep (max: 2)"
        );
    }

    #[test]
    fn test_within_limit() {
        assert!(check(DEEP, &NestingDepth::new()).is_empty());
        assert!(check(DEEP, &NestingDepth::new().max_depth(4)).is_empty());
    }

    #[test]
    fn test_lambda_resets_depth() {
        let code = "\
void f() {
  if (a) {
    auto g = [&]() {
      if (b) {
      }
    };
  }
}
";
        assert!(check(code, &NestingDepth::new().max_depth(1)).is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = Config::parse("[rules.nesting-depth]\nmax_depth = 3\n").unwrap();
        let rule = NestingDepth::from_config(&config.rules[NAME]);
        assert_eq!(rule.max_depth, 3);
        assert!(!rule.allow_in_tests);
    }
}
