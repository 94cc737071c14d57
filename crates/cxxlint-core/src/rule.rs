//! Rule traits for defining lint rules.

use crate::context::FileContext;
use crate::source::SourceFile;
use crate::types::{Severity, Violation};

/// A per-file lint rule over the classified group structure.
///
/// Rules never parse anything themselves: the analyzer scrubs, builds and
/// classifies each file once and hands every rule the same [`SourceFile`].
///
/// # Example
///
/// ```ignore
/// use cxxlint_core::{FileContext, GroupType, Location, Rule, SourceFile, Violation};
///
/// pub struct NoEmptyBodies;
///
/// impl Rule for NoEmptyBodies {
///     fn name(&self) -> &'static str { "no-empty-bodies" }
///     fn code(&self) -> &'static str { "CX900" }
///
///     fn check(&self, ctx: &FileContext, source: &SourceFile) -> Vec<Violation> {
///         let mut violations = Vec::new();
///         source.walk(|_, group, kind| {
///             if kind == GroupType::RoutineBody && group.children().next().is_none() {
///                 // ...
///             }
///         });
///         violations
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "routine-length").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "CX004").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule requires a reason when using allow directives.
    ///
    /// By default, rules with `Severity::Error` require a reason.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Checks a single file and returns any violations found.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Paths and file kind of the file being checked
    /// * `source` - The scrubbed, built and classified file
    fn check(&self, ctx: &FileContext, source: &SourceFile) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupType;
    use crate::lines::ScrubOptions;
    use crate::types::Location;
    use std::path::Path;

    struct CountBodies;

    impl Rule for CountBodies {
        fn name(&self) -> &'static str {
            "count-bodies"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "Reports every routine body"
        }

        fn check(&self, ctx: &FileContext, source: &SourceFile) -> Vec<Violation> {
            let mut violations = Vec::new();
            source.walk(|_, group, kind| {
                if kind == GroupType::RoutineBody {
                    violations.push(Violation::new(
                        self.code(),
                        self.name(),
                        self.default_severity(),
                        Location::from_place(ctx.relative_path.clone(), group.open()),
                        "routine body",
                    ));
                }
            });
            violations
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = CountBodies;
        assert_eq!(rule.name(), "count-bodies");
        assert_eq!(rule.code(), "TEST001");
        assert_eq!(rule.default_severity(), Severity::Error);
        assert!(rule.requires_allow_reason());
    }

    #[test]
    fn rule_sees_classified_groups() {
        let content = "void f() {}\nvoid g()\n{\n}\n";
        let ctx = FileContext::new(Path::new("/p/a.cpp"), content, Path::new("/p"));
        let source = SourceFile::analyze(content, ctx.kind, &ScrubOptions::default());

        let violations = CountBodies.check(&ctx, &source);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].location.file, Path::new("a.cpp"));
        assert_eq!(violations[1].location.line, 3);
        assert_eq!(violations[1].location.column, 1);
    }
}
