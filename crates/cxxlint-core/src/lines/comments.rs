//! Classification of `//` comments against the tag vocabulary.

use serde::{Deserialize, Serialize};

/// Classification of a line's trailing comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentType {
    /// No line comment on this line.
    None,
    /// A comment carrying no recognized tag.
    Plain,
    /// A `///` or `//!` documentation comment.
    Doc,
    /// `TODO`
    Todo,
    /// `FIXME`
    Fixme,
    /// `HACK`
    Hack,
    /// `XXX`
    Xxx,
    /// `NOTE`
    Note,
    /// `BUG`
    Bug,
    /// `NOLINT`
    Nolint,
}

const TAGS: &[(&str, CommentType)] = &[
    ("TODO", CommentType::Todo),
    ("FIXME", CommentType::Fixme),
    ("HACK", CommentType::Hack),
    ("XXX", CommentType::Xxx),
    ("NOTE", CommentType::Note),
    ("BUG", CommentType::Bug),
    ("NOLINT", CommentType::Nolint),
];

const SEVERITY_WORDS: &[&str] = &["IMPORTANT", "CRITICAL", "MAJOR", "MINOR"];

impl CommentType {
    /// Classifies the text following `//`.
    #[must_use]
    pub fn classify(body: &str) -> Self {
        if body.starts_with('/') || body.starts_with('!') {
            return Self::Doc;
        }

        let text = body.trim_start();
        let text = match text.split_once(char::is_whitespace) {
            Some((first, rest)) if SEVERITY_WORDS.contains(&first.trim_end_matches(':')) => {
                rest.trim_start()
            }
            _ => text,
        };

        TAGS.iter()
            .find(|(tag, _)| text.starts_with(tag))
            .map_or(Self::Plain, |&(_, kind)| kind)
    }
}

/// Block keyword named in an end-of-block comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKeyword {
    /// `namespace`
    Namespace,
    /// `class`
    Class,
    /// `struct`
    Struct,
    /// `union`
    Union,
    /// `enum`
    Enum,
}

impl BlockKeyword {
    fn parse(word: &str) -> Option<Self> {
        match word {
            "namespace" => Some(Self::Namespace),
            "class" => Some(Self::Class),
            "struct" => Some(Self::Struct),
            "union" => Some(Self::Union),
            "enum" => Some(Self::Enum),
            _ => None,
        }
    }
}

/// An end-of-block tag such as `// close namespace bdlt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndTag {
    /// Keyword naming the kind of block being closed.
    pub keyword: Option<BlockKeyword>,
    /// Name of the block being closed.
    pub name: Option<String>,
}

impl EndTag {
    /// Recognizes an end-of-block tag in the text following `//`.
    ///
    /// Accepted shapes: `end [keyword] [name]`, `close [keyword] [name]`
    /// and `keyword [name]`.
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        let words: Vec<&str> = body.split_whitespace().collect();
        let mut rest = words.as_slice();

        let explicit = matches!(rest.first(), Some(&("end" | "close")));
        if explicit {
            rest = &rest[1..];
        }

        let keyword = rest.first().and_then(|w| BlockKeyword::parse(w));
        if keyword.is_some() {
            rest = &rest[1..];
        }
        if !explicit && keyword.is_none() {
            return None;
        }

        let name = match rest {
            [] => None,
            [name] if is_qualified_name(name) => Some((*name).to_string()),
            _ => return None,
        };

        Some(Self { keyword, name })
    }
}

fn is_qualified_name(word: &str) -> bool {
    !word.is_empty()
        && word
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_tags() {
        assert_eq!(CommentType::classify(" TODO: later"), CommentType::Todo);
        assert_eq!(CommentType::classify(" FIXME"), CommentType::Fixme);
        assert_eq!(CommentType::classify(" NOTES: a"), CommentType::Note);
        assert_eq!(CommentType::classify(" TODOs"), CommentType::Todo);
        assert_eq!(CommentType::classify("/ docs"), CommentType::Doc);
        assert_eq!(CommentType::classify("! inner"), CommentType::Doc);
        assert_eq!(CommentType::classify(" plain words"), CommentType::Plain);
        assert_eq!(CommentType::classify(""), CommentType::Plain);
    }

    #[test]
    fn strips_severity_word() {
        assert_eq!(CommentType::classify(" IMPORTANT NOTE: x"), CommentType::Note);
        assert_eq!(CommentType::classify(" CRITICAL: BUG here"), CommentType::Bug);
        assert_eq!(CommentType::classify(" IMPORTANT stuff"), CommentType::Plain);
    }

    #[test]
    fn tags_are_case_sensitive() {
        assert_eq!(CommentType::classify(" todo later"), CommentType::Plain);
    }

    #[test]
    fn parses_end_tags() {
        assert_eq!(
            EndTag::parse(" close namespace bdlt"),
            Some(EndTag {
                keyword: Some(BlockKeyword::Namespace),
                name: Some("bdlt".to_string()),
            })
        );
        assert_eq!(
            EndTag::parse(" namespace a::b"),
            Some(EndTag {
                keyword: Some(BlockKeyword::Namespace),
                name: Some("a::b".to_string()),
            })
        );
        assert_eq!(
            EndTag::parse(" end"),
            Some(EndTag {
                keyword: None,
                name: None,
            })
        );
        assert_eq!(
            EndTag::parse(" end class Foo"),
            Some(EndTag {
                keyword: Some(BlockKeyword::Class),
                name: Some("Foo".to_string()),
            })
        );
    }

    #[test]
    fn rejects_ordinary_comments() {
        assert_eq!(EndTag::parse(" increment the counter"), None);
        assert_eq!(EndTag::parse(" namespace for the helpers below"), None);
        assert_eq!(EndTag::parse(""), None);
    }
}
