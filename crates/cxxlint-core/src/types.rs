//! Core types for lint violations and results.

use miette::{NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::diagnostics::Diagnostic;
use crate::place::Place;

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a location from a cursor position in the scrubbed buffer.
    ///
    /// Columns are byte columns, and scrubbing never shifts them, so the
    /// position is also valid in the raw file.
    #[must_use]
    pub fn from_place(file: PathBuf, place: Place) -> Self {
        Self::new(file, place.line(), place.col() + 1)
    }

    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A labeled span for additional context in violations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Location of the label.
    pub location: Location,
    /// Message for this label.
    pub message: String,
}

impl Label {
    /// Creates a new label.
    #[must_use]
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

/// A suggested fix for a violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A lint violation found during analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "CX004").
    pub code: String,
    /// Rule name (e.g., "routine-length").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    pub suggestion: Option<Suggestion>,
    /// Additional labels for context.
    pub labels: Vec<Label>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
            labels: Vec::new(),
        }
    }

    /// Lifts a pipeline diagnostic into a violation of the given rule,
    /// keeping its severity and message.
    #[must_use]
    pub fn from_diagnostic(
        code: impl Into<String>,
        rule: impl Into<String>,
        location: Location,
        diagnostic: &Diagnostic,
    ) -> Self {
        Self::new(
            code,
            rule,
            diagnostic.severity,
            location,
            diagnostic.message.clone(),
        )
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Adds a label to this violation.
    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        for label in &self.labels {
            let _ = writeln!(
                output,
                "  --> {}:{}: {}",
                label.location.line, label.location.column, label.message
            );
        }
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// A violation rendered against its source text with miette.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl ViolationDiagnostic {
    /// Pairs a violation with the full text of the file it points into.
    ///
    /// The span comes from the violation's byte offset; a location without
    /// one is resolved from its line and column.
    #[must_use]
    pub fn new(v: &Violation, source: String) -> Self {
        let offset = if v.location.offset > 0 || (v.location.line <= 1 && v.location.column <= 1) {
            v.location.offset
        } else {
            offset_of(&source, v.location.line, v.location.column)
        };
        let length = v.location.length.max(1).min(source.len().saturating_sub(offset));
        Self {
            message: format!("[{}] {}", v.code, v.message),
            help: v.suggestion.as_ref().map(|s| s.message.clone()),
            source_code: NamedSource::new(v.location.file.display().to_string(), source),
            span: SourceSpan::from((offset, length)),
            label_message: v.rule.clone(),
        }
    }
}

/// Byte offset of a 1-indexed line and column, clamped to the text.
fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Number of files that could not be read.
    #[serde(default)]
    pub files_skipped: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Returns true if there are any warnings or errors.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.has_violations_at(Severity::Warning)
    }

    /// Returns violations filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    /// Returns violations of one rule.
    #[must_use]
    pub fn by_rule(&self, rule: &str) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.rule == rule).collect()
    }

    /// Counts violations by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.violations
            .iter()
            .fold((0, 0, 0), |(e, w, i), v| match v.severity {
                Severity::Error => (e + 1, w, i),
                Severity::Warning => (e, w + 1, i),
                Severity::Info => (e, w, i + 1),
            })
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Adds violations from another result.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.files_checked += other.files_checked;
        self.files_skipped += other.files_skipped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Stage;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "CX004",
            "routine-length",
            severity,
            Location::new(PathBuf::from("src/parser.cpp"), 42, 10),
            "routine body spans 212 lines (max: 150)",
        )
    }

    #[test]
    fn location_from_place_is_one_indexed() {
        let loc = Location::from_place(PathBuf::from("a.h"), Place::new(3, 0));
        assert_eq!((loc.line, loc.column), (3, 1));
    }

    #[test]
    fn violation_from_diagnostic_keeps_severity() {
        let diag = Diagnostic::error(Stage::Build, Place::new(7, 4), "unmatched '}'");
        let location = Location::from_place(PathBuf::from("a.cpp"), diag.place);
        let v = Violation::from_diagnostic("CX001", "bracket-structure", location, &diag);
        assert_eq!(v.severity, Severity::Error);
        assert_eq!(v.location.line, 7);
        assert_eq!(v.location.column, 5);
        assert_eq!(v.message, "unmatched '}'");
    }

    #[test]
    fn violation_format_includes_help_and_labels() {
        let v = make_violation(Severity::Warning)
            .with_suggestion(Suggestion::new("split the routine"))
            .with_label(Label::new(
                Location::new(PathBuf::from("src/parser.cpp"), 253, 1),
                "body closes here",
            ));
        let formatted = v.format();
        assert!(formatted.starts_with("CX004 routine-length at src/parser.cpp:42:10"));
        assert!(formatted.contains("--> 253:1: body closes here"));
        assert!(formatted.contains("= help: split the routine"));
    }

    #[test]
    fn violation_display() {
        let v = make_violation(Severity::Error);
        assert_eq!(
            v.to_string(),
            "src/parser.cpp:42:10: error [CX004] routine body spans 212 lines (max: 150)"
        );
    }

    #[test]
    fn diagnostic_span_resolved_from_line_and_column() {
        assert_eq!(offset_of("ab\ncd\nef", 2, 2), 4);
        assert_eq!(offset_of("ab", 5, 1), 2);
        let mut v = make_violation(Severity::Error);
        v.location = Location::new(PathBuf::from("x.cpp"), 2, 1);
        let diag = ViolationDiagnostic::new(&v, "int a;\nint b;\n".to_string());
        assert_eq!(diag.span.offset(), 7);
    }

    #[test]
    fn has_violations_at_error_only() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning));
        assert!(!result.has_violations_at(Severity::Error));
        assert!(result.has_violations_at(Severity::Warning));
        assert_eq!(result.count_by_severity(), (0, 1, 0));
    }
}
