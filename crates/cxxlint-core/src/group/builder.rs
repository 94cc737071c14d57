//! Recursive bracket matching.
//!
//! Nesting beyond [`MAX_NESTING`] levels ends the build for the file as if
//! the input had run out.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use super::{Group, GroupId, GroupTree};
use crate::diagnostics::{Diagnostic, DiagnosticSink, Stage};
use crate::lines::Lines;
use crate::place::Place;

const BRACKETS: &[u8] = b"(){}";

/// Bytes that may follow `operator` in an operator function name.
const OPERATOR_BYTES: &[u8] = b"=!<>+-*/%^&|~[](),";

/// Deepest bracket nesting the builder descends into.
pub(super) const MAX_NESTING: usize = 256;

/// Why a group could not be closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A parenthesis was closed by `}`; an enclosing brace may absorb it.
    #[error("closed by the wrong bracket at {at}")]
    ClosedWrong {
        /// Position of the offending closer.
        at: Place,
    },
    /// End of file reached while the group was open.
    #[error("not closed before end of file")]
    EarlyEof,
}

pub(super) struct Builder<'a> {
    lines: &'a Lines,
    sink: &'a mut dyn DiagnosticSink,
    groups: Vec<Group>,
    early_eof: bool,
}

impl<'a> Builder<'a> {
    pub(super) fn new(lines: &'a Lines, sink: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            lines,
            sink,
            groups: Vec::new(),
            early_eof: false,
        }
    }

    pub(super) fn build(mut self) -> GroupTree {
        let origin = Place::new(0, 0);
        self.groups.push(Group {
            open: origin,
            close: Place::end(self.lines),
            paren: false,
            prev_word: String::new(),
            prev_word_begin: Place::rend(),
            statement_start: origin,
            parent: None,
            children: BTreeMap::new(),
        });

        let mut pos = origin;
        while let Some(open) = self.find_opener(pos) {
            match self.build_group(GroupId::ROOT, open, 1) {
                Ok(child) => pos = self.adopt(GroupId::ROOT, child),
                Err(BuildError::ClosedWrong { at }) => pos = at.next(self.lines),
                Err(BuildError::EarlyEof) => {
                    self.early_eof = true;
                    break;
                }
            }
        }

        debug!(
            groups = self.groups.len(),
            early_eof = self.early_eof,
            "built group tree"
        );
        GroupTree {
            groups: self.groups,
            early_eof: self.early_eof,
        }
    }

    /// Next opener at or after `from`, reporting every closer skipped on
    /// the way.
    fn find_opener(&mut self, from: Place) -> Option<Place> {
        let mut pos = from;
        loop {
            let p = pos.find_first_of(self.lines, BRACKETS);
            if p.is_end(self.lines) {
                return None;
            }
            let c = p.get(self.lines);
            if c == b'(' || c == b'{' {
                return Some(p);
            }
            self.sink.report(Diagnostic::error(
                Stage::Build,
                p,
                format!("unmatched '{}'", char::from(c)),
            ));
            pos = p.next(self.lines);
        }
    }

    /// Inserts a closed child and returns the position to resume from.
    fn adopt(&mut self, parent: GroupId, child: GroupId) -> Place {
        let group = &self.groups[child.0];
        let (open, close) = (group.open, group.close);
        self.groups[parent.0].children.insert(open, child);
        close.next(self.lines)
    }

    fn build_group(
        &mut self,
        parent: GroupId,
        open: Place,
        depth: usize,
    ) -> Result<GroupId, BuildError> {
        let lines = self.lines;
        if depth > MAX_NESTING {
            self.sink.report(Diagnostic::error(
                Stage::Build,
                open,
                format!("brackets nested deeper than {MAX_NESTING} levels"),
            ));
            return Err(BuildError::EarlyEof);
        }
        let paren = open.get(lines) == b'(';
        let (prev_word, prev_word_begin) = preceding_name(lines, open, paren);
        let statement_start = statement_start(lines, open, &prev_word, prev_word_begin);

        let id = GroupId(self.groups.len());
        self.groups.push(Group {
            open,
            close: open,
            paren,
            prev_word,
            prev_word_begin,
            statement_start,
            parent: Some(parent),
            children: BTreeMap::new(),
        });

        let (closer, wrong) = if paren { (b')', b'}') } else { (b'}', b')') };
        let mut pos = open.next(lines);
        loop {
            let p = pos.find_first_of(lines, BRACKETS);
            if p.is_end(lines) {
                self.sink.report(Diagnostic::error(
                    Stage::Build,
                    open,
                    format!("'{}' is not closed before end of file", char::from(open.get(lines))),
                ));
                self.groups.truncate(id.0);
                return Err(BuildError::EarlyEof);
            }

            let c = p.get(lines);
            if c == closer {
                self.groups[id.0].close = p;
                return Ok(id);
            }
            if c == wrong {
                if paren {
                    self.sink.report(Diagnostic::error(
                        Stage::Build,
                        p,
                        format!("'}}' closes '(' opened at {open}"),
                    ));
                    self.groups.truncate(id.0);
                    return Err(BuildError::ClosedWrong { at: p });
                }
                self.sink.report(Diagnostic::error(
                    Stage::Build,
                    p,
                    format!("unmatched ')' inside '{{' opened at {open}"),
                ));
                pos = p.next(lines);
                continue;
            }

            match self.build_group(id, p, depth + 1) {
                Ok(child) => pos = self.adopt(id, child),
                Err(BuildError::ClosedWrong { at }) if !paren => {
                    self.groups[id.0].close = at;
                    return Ok(id);
                }
                Err(err) => {
                    self.groups.truncate(id.0);
                    return Err(err);
                }
            }
        }
    }
}

/// The name in front of an opening bracket and where it starts.
fn preceding_name(lines: &Lines, open: Place, paren: bool) -> (String, Place) {
    let (word, begin) = open.prev(lines).word_before(lines);

    if word.is_empty() {
        if let Some(found) = operator_name(lines, open) {
            return found;
        }
        if begin.get(lines) == b'>' {
            let touching = begin.line() == open.line() && begin.col() + 1 == open.col();
            if paren || touching {
                let (name, at) = begin.template_name_before(lines);
                if !name.is_empty() {
                    return (name, at);
                }
            }
        }
        return (word, begin);
    }

    if word == "new" || word == "delete" {
        let (before, at) = begin.prev(lines).word_before(lines);
        if before == "operator" {
            return (format!("operator {word}"), at);
        }
    }
    (word, begin)
}

/// Recognizes `operator==(`, `operator()(` and friends on the open's line.
fn operator_name(lines: &Lines, open: Place) -> Option<(String, Place)> {
    let text = lines.text(open.line()).get(..open.col())?.trim_end();
    let head = text.trim_end_matches(|c: char| {
        u8::try_from(c).is_ok_and(|b| OPERATOR_BYTES.contains(&b))
    });
    let symbol = &text[head.len()..];
    let head = head.trim_end();
    if symbol.is_empty() || !head.ends_with("operator") {
        return None;
    }
    let start = head.len() - "operator".len();
    if head[..start]
        .bytes()
        .next_back()
        .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
    {
        return None;
    }
    Some((format!("operator{symbol}"), Place::new(open.line(), start)))
}

/// Statement start for a group, corrected when the bracket sits on its
/// own line under the keyword that introduces it.
fn statement_start(lines: &Lines, open: Place, word: &str, begin: Place) -> Place {
    let start = open.statement_start(lines);
    if begin.is_rend() {
        return start;
    }
    let before = open.prev(lines).skip_space_back(lines).get(lines);
    if start > begin || (word.is_empty() && !matches!(before, b';' | b'{' | b'}')) {
        begin.statement_start(lines)
    } else {
        start
    }
}
