//! Per-line statement classification and statement-end detection.

use serde::{Deserialize, Serialize};

use crate::context::FileKind;

/// Coarse classification of a line by its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatementType {
    /// No code on the line.
    Blank,
    /// Code that starts with no recognized keyword.
    Other,
    /// `if`
    If,
    /// `else`
    Else,
    /// `for`
    For,
    /// `while`
    While,
    /// `do`
    Do,
    /// `switch`
    Switch,
    /// `case`
    Case,
    /// `default`
    Default,
    /// `return`
    Return,
    /// `break`, `continue`, `goto`
    Jump,
    /// `try`
    Try,
    /// `catch`
    Catch,
    /// `throw`
    Throw,
    /// `class`
    Class,
    /// `struct`
    Struct,
    /// `union`
    Union,
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
    /// `namespace`
    Namespace,
    /// `using`
    Using,
    /// `template`
    Template,
    /// `enum`
    Enum,
    /// `friend`
    Friend,
    /// `inline`
    Inline,
    /// `static`
    Static,
    /// `extern`
    Extern,
    /// `typedef`
    Typedef,
    /// `virtual`
    Virtual,
    /// An assertion macro such as `assert` or `BSLS_ASSERT`.
    Assert,
}

const ASSERT_KEYWORDS: &[&str] = &[
    "assert",
    "static_assert",
    "ASSERT",
    "BSLS_ASSERT",
    "BSLS_ASSERT_SAFE",
    "BSLS_ASSERT_OPT",
    "DCHECK",
    "CHECK",
];

/// Leading words that mark an assertion in test drivers, matched as prefixes.
const TEST_ASSERT_PREFIXES: &[&str] = &["ASSERT", "EXPECT", "LOOP_ASSERT", "TEST"];

impl StatementType {
    /// Maps a leading keyword to its statement type.
    #[must_use]
    pub fn from_keyword(word: &str) -> Self {
        match word {
            "" => Self::Blank,
            "if" => Self::If,
            "else" => Self::Else,
            "for" => Self::For,
            "while" => Self::While,
            "do" => Self::Do,
            "switch" => Self::Switch,
            "case" => Self::Case,
            "default" => Self::Default,
            "return" | "co_return" => Self::Return,
            "break" | "continue" | "goto" => Self::Jump,
            "try" | "__try" => Self::Try,
            "catch" | "__except" => Self::Catch,
            "throw" => Self::Throw,
            "class" => Self::Class,
            "struct" => Self::Struct,
            "union" => Self::Union,
            "public" => Self::Public,
            "protected" => Self::Protected,
            "private" => Self::Private,
            "namespace" => Self::Namespace,
            "using" => Self::Using,
            "template" => Self::Template,
            "enum" => Self::Enum,
            "friend" => Self::Friend,
            "inline" => Self::Inline,
            "static" => Self::Static,
            "extern" => Self::Extern,
            "typedef" => Self::Typedef,
            "virtual" => Self::Virtual,
            w if ASSERT_KEYWORDS.contains(&w) => Self::Assert,
            _ => Self::Other,
        }
    }

    /// Statement types whose line may end in a bare `:`.
    #[must_use]
    pub fn is_label_context(self) -> bool {
        matches!(
            self,
            Self::Case | Self::Default | Self::Public | Self::Protected | Self::Private
        )
    }

    /// `class`, `struct` or `union`.
    #[must_use]
    pub fn is_class_key(self) -> bool {
        matches!(self, Self::Class | Self::Struct | Self::Union)
    }
}

/// First identifier on a line, ignoring leading closing braces.
pub(crate) fn first_word(text: &str) -> &str {
    let rest = text.trim_start_matches(|c: char| c.is_whitespace() || c == '}');
    let end = rest
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(rest.len());
    &rest[..end]
}

pub(super) fn classify_line(text: &str, kind: FileKind, markers: &[String]) -> StatementType {
    if text.trim().is_empty() {
        return StatementType::Blank;
    }
    let word = first_word(text);
    let statement = StatementType::from_keyword(word);
    if statement != StatementType::Other || word.is_empty() {
        return statement;
    }

    let is_marker = markers.iter().any(|m| word.starts_with(m.as_str()))
        || (kind.is_test() && TEST_ASSERT_PREFIXES.iter().any(|p| word.starts_with(p)));
    if is_marker {
        StatementType::Assert
    } else {
        StatementType::Other
    }
}

pub(super) fn ends_statement(text: &str, statement: StatementType) -> bool {
    let text = text.trim_end();
    match text.as_bytes().last() {
        None => true,
        Some(b'{' | b'}' | b';') => true,
        Some(b':') => !text.ends_with("::") && statement.is_label_context(),
        Some(b')') => statement == StatementType::Assert,
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_word_skips_closing_braces() {
        assert_eq!(first_word("  } else {"), "else");
        assert_eq!(first_word("}} while (x);"), "while");
        assert_eq!(first_word("public:"), "public");
        assert_eq!(first_word("  ::std::abort();"), "");
    }

    #[test]
    fn classifies_keywords() {
        let none: &[String] = &[];
        let kind = FileKind::Implementation;
        assert_eq!(classify_line("", kind, none), StatementType::Blank);
        assert_eq!(classify_line("  if (x) {", kind, none), StatementType::If);
        assert_eq!(classify_line("} else {", kind, none), StatementType::Else);
        assert_eq!(classify_line("template <class T>", kind, none), StatementType::Template);
        assert_eq!(classify_line("BSLS_ASSERT(x);", kind, none), StatementType::Assert);
        assert_eq!(classify_line("int x;", kind, none), StatementType::Other);
    }

    #[test]
    fn test_drivers_extend_assertion_markers() {
        let none: &[String] = &[];
        assert_eq!(
            classify_line("ASSERT_EQ(a, b)", FileKind::TestDriver, none),
            StatementType::Assert
        );
        assert_eq!(
            classify_line("ASSERT_EQ(a, b)", FileKind::Implementation, none),
            StatementType::Other
        );
        let markers = vec!["MY_CHECK".to_string()];
        assert_eq!(
            classify_line("MY_CHECK_THAT(a)", FileKind::Implementation, &markers),
            StatementType::Assert
        );
    }

    #[test]
    fn statement_ends() {
        assert!(ends_statement("", StatementType::Blank));
        assert!(ends_statement("int x;", StatementType::Other));
        assert!(ends_statement("if (x) {", StatementType::If));
        assert!(ends_statement("}", StatementType::Other));
        assert!(ends_statement("  case 3:", StatementType::Case));
        assert!(!ends_statement("Foo::Foo() :", StatementType::Other));
        assert!(!ends_statement("std::", StatementType::Case));
        assert!(ends_statement("ASSERT(x)", StatementType::Assert));
        assert!(!ends_statement("foo(x)", StatementType::Other));
        assert!(!ends_statement("int a,", StatementType::Other));
    }
}
