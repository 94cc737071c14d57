//! Line buffer and scrubber.
//!
//! [`Lines`] loads one file and rewrites it in place through a fixed
//! sequence of passes, each relying on the previous one:
//!
//! 1. load (index 0 is an empty sentinel, one empty guard line is appended)
//! 2. quote and comment blanking ([`literals`])
//! 3. trailing whitespace trim
//! 4. dead conditional and directive blanking ([`preprocessor`])
//! 5. indent measurement
//! 6. statement classification ([`statements`])
//! 7. statement-end detection
//!
//! Blanking never removes characters before the last code character of a
//! line, so every column in the scrubbed text matches the raw text.

mod comments;
mod literals;
mod preprocessor;
mod statements;

pub use comments::{BlockKeyword, CommentType, EndTag};
pub use statements::StatementType;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::FileKind;
use crate::diagnostics::{Diagnostic, DiagnosticSink, Stage};
use crate::place::Place;

/// Character written over the contents of string and character literals.
pub const FILLER: u8 = b'`';

/// Options for the scrubber, read from the `[scrub]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrubOptions {
    /// Raw lines longer than this many characters are reported.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,

    /// Extra leading words that mark a wrapped assertion macro.
    #[serde(default)]
    pub assert_markers: Vec<String>,
}

impl Default for ScrubOptions {
    fn default() -> Self {
        Self {
            max_line_length: default_max_line_length(),
            assert_markers: Vec::new(),
        }
    }
}

fn default_max_line_length() -> usize {
    79
}

/// Scrubbed text of one file plus the per-line tables.
///
/// All tables share one index space: index 0 is the synthetic empty line,
/// physical lines are `1..=line_count()`, and the last index is an empty
/// guard line.
#[derive(Debug, Clone)]
pub struct Lines {
    raw: Vec<String>,
    text: Vec<String>,
    comment: Vec<CommentType>,
    comment_col: Vec<Option<usize>>,
    end_tag: Vec<Option<EndTag>>,
    indent: Vec<usize>,
    statement: Vec<StatementType>,
    statement_end: Vec<bool>,
    kind: FileKind,
}

impl Lines {
    /// Runs every scrubbing pass over `source`.
    pub fn scrub(
        source: &str,
        kind: FileKind,
        options: &ScrubOptions,
        sink: &mut dyn DiagnosticSink,
    ) -> Self {
        let mut lines = Self::load(source, kind);
        lines.check_hygiene(options, sink);
        literals::blank_literals_and_comments(&mut lines, sink);
        lines.trim_trailing_whitespace();
        preprocessor::blank_dead_conditionals(&mut lines, sink);
        preprocessor::blank_directives(&mut lines);
        lines.measure_indents();
        lines.classify_statements(options);
        lines.detect_statement_ends();

        debug!(
            lines = lines.line_count(),
            kind = ?kind,
            "scrubbed source"
        );
        lines
    }

    fn load(source: &str, kind: FileKind) -> Self {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);

        let mut raw = Vec::with_capacity(source.len() / 32 + 2);
        raw.push(String::new());
        raw.extend(source.lines().map(String::from));
        raw.push(String::new());

        let len = raw.len();
        Self {
            text: raw.clone(),
            raw,
            comment: vec![CommentType::None; len],
            comment_col: vec![None; len],
            end_tag: vec![None; len],
            indent: vec![0; len],
            statement: vec![StatementType::Blank; len],
            statement_end: vec![true; len],
            kind,
        }
    }

    fn check_hygiene(&self, options: &ScrubOptions, sink: &mut dyn DiagnosticSink) {
        for idx in 1..=self.line_count() {
            let raw = &self.raw[idx];
            if let Some(col) = raw.find('\t') {
                sink.report(Diagnostic::warning(
                    Stage::Scrub,
                    Place::new(idx, col),
                    "tab character",
                ));
            }
            let width = raw.chars().count();
            if width > options.max_line_length {
                sink.report(Diagnostic::warning(
                    Stage::Scrub,
                    Place::new(idx, options.max_line_length),
                    format!(
                        "line is {width} characters long (max: {})",
                        options.max_line_length
                    ),
                ));
            }
        }
    }

    fn trim_trailing_whitespace(&mut self) {
        for text in &mut self.text {
            let keep = text.trim_end().len();
            text.truncate(keep);
        }
    }

    fn measure_indents(&mut self) {
        for (indent, text) in self.indent.iter_mut().zip(&self.text) {
            *indent = text.bytes().position(|b| b != b' ' && b != b'\t').unwrap_or(0);
        }
    }

    fn classify_statements(&mut self, options: &ScrubOptions) {
        for (statement, text) in self.statement.iter_mut().zip(&self.text) {
            *statement = statements::classify_line(text, self.kind, &options.assert_markers);
        }
    }

    fn detect_statement_ends(&mut self) {
        for idx in 0..self.text.len() {
            self.statement_end[idx] = statements::ends_statement(&self.text[idx], self.statement[idx]);
        }
    }

    /// Number of physical lines (excludes the sentinel and the guard).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.text.len() - 2
    }

    /// Index of the trailing guard line, the last valid index.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.text.len() - 1
    }

    /// The file kind the scrubber ran with.
    #[must_use]
    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Scrubbed text of a line; empty outside the buffer.
    #[must_use]
    pub fn text(&self, line: usize) -> &str {
        self.text.get(line).map_or("", String::as_str)
    }

    /// Original text of a line, before any blanking.
    #[must_use]
    pub fn raw(&self, line: usize) -> &str {
        self.raw.get(line).map_or("", String::as_str)
    }

    /// Classification of the line comment on this line.
    #[must_use]
    pub fn comment(&self, line: usize) -> CommentType {
        self.comment.get(line).copied().unwrap_or(CommentType::None)
    }

    /// Column where the line comment starts, if any.
    #[must_use]
    pub fn comment_col(&self, line: usize) -> Option<usize> {
        self.comment_col.get(line).copied().flatten()
    }

    /// End-of-block tag recognized in this line's comment.
    #[must_use]
    pub fn end_tag(&self, line: usize) -> Option<&EndTag> {
        self.end_tag.get(line).and_then(Option::as_ref)
    }

    /// Column of the first non-blank character (0 for blank lines).
    #[must_use]
    pub fn indent(&self, line: usize) -> usize {
        self.indent.get(line).copied().unwrap_or(0)
    }

    /// Statement type derived from the line's leading keyword.
    #[must_use]
    pub fn statement(&self, line: usize) -> StatementType {
        self.statement
            .get(line)
            .copied()
            .unwrap_or(StatementType::Blank)
    }

    /// Whether this line is the last line of a logical statement.
    #[must_use]
    pub fn is_statement_end(&self, line: usize) -> bool {
        self.statement_end.get(line).copied().unwrap_or(true)
    }

    /// Whether the scrubbed line has no code left.
    #[must_use]
    pub fn is_blank(&self, line: usize) -> bool {
        self.text(line).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrub(source: &str) -> (Lines, Vec<Diagnostic>) {
        let mut sink = Vec::new();
        let lines = Lines::scrub(
            source,
            FileKind::Implementation,
            &ScrubOptions::default(),
            &mut sink,
        );
        (lines, sink)
    }

    #[test]
    fn sentinel_and_guard_lines() {
        let (lines, _) = scrub("int a;\nint b;\n");
        assert_eq!(lines.line_count(), 2);
        assert_eq!(lines.last_index(), 3);
        assert_eq!(lines.text(0), "");
        assert_eq!(lines.text(1), "int a;");
        assert_eq!(lines.text(3), "");
        assert!(lines.is_statement_end(0));
    }

    #[test]
    fn empty_source_has_only_sentinels() {
        let (lines, diags) = scrub("");
        assert_eq!(lines.line_count(), 0);
        assert_eq!(lines.last_index(), 1);
        assert!(diags.is_empty());
    }

    #[test]
    fn string_contents_are_filled_and_columns_kept() {
        let source = r#"f("a(b", 'x'); g();"#;
        let (lines, _) = scrub(source);
        let text = lines.text(1);
        assert_eq!(text.len(), source.len());
        assert_eq!(text, "f(\"```\", '`'); g();");
        assert_eq!(text.find("g()"), source.find("g()"));
    }

    #[test]
    fn escaped_quote_stays_inside_literal() {
        let (lines, _) = scrub(r#"s = "a\"{"; t();"#);
        assert_eq!(lines.text(1), "s = \"````\"; t();");
    }

    #[test]
    fn digit_separator_is_not_a_quote() {
        let (lines, _) = scrub("int n = 1'000'000; f(n);");
        assert_eq!(lines.text(1), "int n = 1'000'000; f(n);");
    }

    #[test]
    fn line_comment_is_removed_and_classified() {
        let (lines, _) = scrub("int x; // TODO: remove\nint y;   // plain words");
        assert_eq!(lines.text(1), "int x;");
        assert_eq!(lines.comment(1), CommentType::Todo);
        assert_eq!(lines.comment_col(1), Some(7));
        assert_eq!(lines.text(2), "int y;");
        assert_eq!(lines.comment(2), CommentType::Plain);
        assert_eq!(lines.comment(3), CommentType::None);
    }

    #[test]
    fn block_comment_spans_lines() {
        let (lines, _) = scrub("int a; /* {\n ( */ int b;\nint c;");
        assert_eq!(lines.text(1), "int a;");
        assert_eq!(lines.text(2), "      int b;");
        assert_eq!(lines.indent(2), 6);
        assert_eq!(lines.text(3), "int c;");
    }

    #[test]
    fn comment_markers_inside_strings_are_ignored() {
        let (lines, _) = scrub(r#"url = "http://x"; /* c */ n = 1;"#);
        assert_eq!(lines.text(1), "url = \"````````\";         n = 1;");
        assert_eq!(lines.comment(1), CommentType::None);
    }

    #[test]
    fn continued_string_keeps_backslash() {
        let (lines, diags) = scrub("#define S \"abc \\\n  def\"\nint x;");
        assert!(lines.is_blank(1));
        assert!(lines.is_blank(2));
        assert_eq!(lines.text(3), "int x;");
        assert!(diags.is_empty());
    }

    #[test]
    fn unterminated_literal_is_reported() {
        let (_, diags) = scrub("char c = 'x;\nint y;");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].stage, Stage::Scrub);
        assert!(diags[0].message.contains("unterminated"));
    }

    #[test]
    fn if_zero_region_is_blanked() {
        let source = "int a;\n#if 0\nvoid f( {\n#if X\n}\n#endif\n#endif\nint b;";
        let (lines, diags) = scrub(source);
        for line in 2..=7 {
            assert!(lines.is_blank(line), "line {line} should be blank");
        }
        assert_eq!(lines.text(8), "int b;");
        assert!(diags.is_empty());
    }

    #[test]
    fn else_branch_is_blanked_and_if_branch_kept() {
        let source = "#ifdef WIN32\nint a;\n#else\nint b;\n#endif\nint c;";
        let (lines, _) = scrub(source);
        assert!(lines.is_blank(1));
        assert_eq!(lines.text(2), "int a;");
        assert!(lines.is_blank(3));
        assert!(lines.is_blank(4));
        assert!(lines.is_blank(5));
        assert_eq!(lines.text(6), "int c;");
    }

    #[test]
    fn continued_directive_is_blanked() {
        let source = "#define MAX(a, b) \\\n    ((a) > (b) ? \\\n     (a) : (b))\nint x;";
        let (lines, _) = scrub(source);
        assert!(lines.is_blank(1));
        assert!(lines.is_blank(2));
        assert!(lines.is_blank(3));
        assert_eq!(lines.text(4), "int x;");
    }

    #[test]
    fn continued_error_directive_is_blanked() {
        let (lines, diags) = scrub("#error don't \\\n  foo( { 'x\nint x;\n");
        assert!(lines.is_blank(1));
        assert!(lines.is_blank(2));
        assert_eq!(lines.text(3), "int x;");
        assert!(diags.is_empty(), "{diags:?}");
    }

    #[test]
    fn missing_endif_is_an_error() {
        let (lines, diags) = scrub("#if 0\nint a;\n");
        assert!(lines.is_blank(2));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, crate::Severity::Error);
    }

    #[test]
    fn statement_types_and_ends() {
        let source = "class Foo {\n  public:\n    Foo(int a,\n        int b);\n};";
        let (lines, _) = scrub(source);
        assert_eq!(lines.statement(1), StatementType::Class);
        assert!(lines.is_statement_end(1));
        assert_eq!(lines.statement(2), StatementType::Public);
        assert!(lines.is_statement_end(2));
        assert_eq!(lines.statement(3), StatementType::Other);
        assert!(!lines.is_statement_end(3));
        assert!(lines.is_statement_end(4));
        assert!(lines.is_statement_end(5));
    }

    #[test]
    fn hygiene_reports_tabs_and_long_lines() {
        let long = format!("int x; // {}", "y".repeat(80));
        let source = format!("\tint a;\n{long}\n");
        let (_, diags) = scrub(&source);
        assert_eq!(diags.len(), 2);
        assert!(diags[0].message.contains("tab"));
        assert_eq!(diags[0].place, Place::new(1, 0));
        assert!(diags[1].message.contains("max: 79"));
    }

    #[test]
    fn end_tag_is_recorded() {
        let (lines, _) = scrub("namespace a {\n}  // close namespace a");
        let tag = lines.end_tag(2).cloned();
        assert_eq!(
            tag,
            Some(EndTag {
                keyword: Some(BlockKeyword::Namespace),
                name: Some("a".to_string()),
            })
        );
    }
}
