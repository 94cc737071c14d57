//! Rule to report brackets the classifier could not place.
//!
//! # Rationale
//!
//! A group classified as unknown usually hides a macro that expands to a
//! declaration or a statement. Checks that depend on the group's role
//! skip it silently, so the gap is worth surfacing.
//!
//! # Detected Patterns
//!
//! - `{` after a word or symbol that introduces no known construct
//! - `if`, `switch` or `catch` parentheses outside any code body
//!
//! # Configuration
//!
//! - `allow_in_tests`: Skip test drivers (default: false)
//! - `ignore_macros`: Words whose `{` is never reported, such as
//!   `["BEGIN_MESSAGE_MAP", "TEST_F"]` (default: empty)

use cxxlint_core::{
    Diagnostic, FileContext, Rule, RuleConfig, Severity, SourceFile, Stage, Violation,
};

use crate::stage::stage_violations_where;

/// Rule code for strange-context.
pub const CODE: &str = "CX002";

/// Rule name for strange-context.
pub const NAME: &str = "strange-context";

/// Reports groups whose role could not be determined.
#[derive(Debug, Clone)]
pub struct StrangeContext {
    /// Skip test drivers.
    pub allow_in_tests: bool,
    /// Words before `{` that are known macros.
    pub ignore_macros: Vec<String>,
}

impl Default for StrangeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl StrangeContext {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allow_in_tests: false,
            ignore_macros: Vec::new(),
        }
    }

    /// Creates a rule from its `[rules.strange-context]` options.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        Self::new()
            .allow_in_tests(config.get_bool("allow_in_tests", false))
            .ignore_macros(config.get_str_array("ignore_macros"))
    }

    /// Sets the words whose braces are never reported.
    #[must_use]
    pub fn ignore_macros(mut self, words: Vec<String>) -> Self {
        self.ignore_macros = words;
        self
    }

    /// Whether the diagnostic is about the brace of an ignored macro.
    fn is_ignored(&self, source: &SourceFile, diagnostic: &Diagnostic) -> bool {
        if self.ignore_macros.is_empty() {
            return false;
        }
        let group = source.group(source.find_group_for_place(diagnostic.place));
        group.open() == diagnostic.place
            && self.ignore_macros.iter().any(|w| w == group.prev_word())
    }

    /// Sets whether to skip test drivers.
    #[must_use]
    pub fn allow_in_tests(mut self, allow: bool) -> Self {
        self.allow_in_tests = allow;
        self
    }
}

impl Rule for StrangeContext {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Reports brackets in a context the classifier does not recognize"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &FileContext, source: &SourceFile) -> Vec<Violation> {
        if self.allow_in_tests && ctx.kind.is_test() {
            return Vec::new();
        }
        stage_violations_where(ctx, source, Stage::Classify, CODE, NAME, |d| {
            !self.is_ignored(source, d)
        })
    }
}
