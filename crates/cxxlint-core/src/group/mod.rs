//! Bracket-region tree and its semantic classification.
//!
//! Groups live in an arena owned by [`GroupTree`]; links between them are
//! [`GroupId`] indices. Children are keyed by their open position, so
//! iteration order is source order.

mod builder;
mod classifier;

pub use builder::BuildError;
pub use classifier::{Classification, Classifier};

use std::collections::BTreeMap;
use std::fmt;

use crate::diagnostics::DiagnosticSink;
use crate::lines::Lines;
use crate::place::Place;

/// Index of a group in its [`GroupTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(usize);

impl GroupId {
    /// The whole-file root group.
    pub const ROOT: Self = Self(0);

    /// Position in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Semantic role of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupType {
    /// The whole file.
    File,
    /// Condition of `if`, `while` or `for`.
    IfWhileFor,
    /// Condition of `switch`.
    SwitchParens,
    /// Parameter of `catch`.
    CatchParens,
    /// Body of an `asm` statement.
    Asm,
    /// `throw(...)` or `noexcept(...)` specification.
    ThrowParens,
    /// Parenthesized subexpression, cast or operator argument.
    ExpressionParens,
    /// Member initializer in a constructor's initializer list.
    CtorClause,
    /// Parameter list of a routine declaration or definition.
    RoutineDecl,
    /// Argument list of a call.
    RoutineCall,
    /// Brace initializer.
    InitBraces,
    /// Body of a class, struct or union.
    Class,
    /// Nested block inside a routine.
    CodeBody,
    /// Body of a namespace or `extern "C"` block.
    Namespace,
    /// Enumerator list.
    Enum,
    /// Body of a routine or lambda.
    RoutineBody,
    /// No rule matched.
    Unknown,
}

impl GroupType {
    /// Regions whose direct contents are declarations rather than statements.
    #[must_use]
    pub fn is_declaration_scope(self) -> bool {
        matches!(self, Self::File | Self::Namespace | Self::Class | Self::Enum)
    }

    /// Regions whose direct contents are executable statements.
    #[must_use]
    pub fn is_executable(self) -> bool {
        matches!(self, Self::CodeBody | Self::RoutineBody)
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::File => "FILE",
            Self::IfWhileFor => "IF_WHILE_FOR",
            Self::SwitchParens => "SWITCH_PARENS",
            Self::CatchParens => "CATCH_PARENS",
            Self::Asm => "ASM",
            Self::ThrowParens => "THROW_PARENS",
            Self::ExpressionParens => "EXPRESSION_PARENS",
            Self::CtorClause => "CTOR_CLAUSE",
            Self::RoutineDecl => "ROUTINE_DECL",
            Self::RoutineCall => "ROUTINE_CALL",
            Self::InitBraces => "INIT_BRACES",
            Self::Class => "CLASS",
            Self::CodeBody => "CODE_BODY",
            Self::Namespace => "NAMESPACE",
            Self::Enum => "ENUM",
            Self::RoutineBody => "ROUTINE_BODY",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// One matched bracket region, or the whole file.
#[derive(Debug, Clone)]
pub struct Group {
    open: Place,
    close: Place,
    paren: bool,
    prev_word: String,
    prev_word_begin: Place,
    statement_start: Place,
    parent: Option<GroupId>,
    children: BTreeMap<Place, GroupId>,
}

impl Group {
    /// Position of the opening bracket (`(0, 0)` for the root).
    #[must_use]
    pub fn open(&self) -> Place {
        self.open
    }

    /// Position of the closing bracket ([`Place::end`] for the root).
    #[must_use]
    pub fn close(&self) -> Place {
        self.close
    }

    /// Whether the region is delimited by `(` `)`.
    #[must_use]
    pub fn is_paren(&self) -> bool {
        self.paren
    }

    /// Identifier or qualified name just before the opening bracket.
    #[must_use]
    pub fn prev_word(&self) -> &str {
        &self.prev_word
    }

    /// Start of [`Group::prev_word`], or of the nearest non-blank byte
    /// when the word is empty.
    #[must_use]
    pub fn prev_word_begin(&self) -> Place {
        self.prev_word_begin
    }

    /// First code position of the statement the opening bracket belongs to.
    #[must_use]
    pub fn statement_start(&self) -> Place {
        self.statement_start
    }

    /// Enclosing group; `None` only for the root.
    #[must_use]
    pub fn parent(&self) -> Option<GroupId> {
        self.parent
    }

    /// Direct children in source order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = GroupId> + '_ {
        self.children.values().copied()
    }

    /// Whether `place` lies within `[open, close]`.
    #[must_use]
    pub fn contains(&self, place: Place) -> bool {
        self.open <= place && place <= self.close
    }

    /// Number of physical lines spanned, counting both bracket lines.
    #[must_use]
    pub fn line_span(&self) -> usize {
        self.close.line().saturating_sub(self.open.line()) + 1
    }
}

/// All groups of one file, rooted at [`GroupId::ROOT`].
#[derive(Debug, Clone)]
pub struct GroupTree {
    groups: Vec<Group>,
    early_eof: bool,
}

impl GroupTree {
    /// Matches every bracket in the scrubbed buffer.
    pub fn build(lines: &Lines, sink: &mut dyn DiagnosticSink) -> Self {
        builder::Builder::new(lines, sink).build()
    }

    /// The root id.
    #[must_use]
    pub fn root(&self) -> GroupId {
        GroupId::ROOT
    }

    /// Looks up a group. Ids always come from this tree.
    #[must_use]
    pub fn get(&self, id: GroupId) -> &Group {
        &self.groups[id.0]
    }

    /// Number of groups, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Always false: the root is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every id, in pre-order.
    pub fn ids(&self) -> impl Iterator<Item = GroupId> {
        (0..self.groups.len()).map(GroupId)
    }

    /// Enclosing group of `id`.
    #[must_use]
    pub fn parent(&self, id: GroupId) -> Option<GroupId> {
        self.get(id).parent
    }

    /// Direct children of `id` in source order.
    pub fn children(&self, id: GroupId) -> impl DoubleEndedIterator<Item = GroupId> + '_ {
        self.get(id).children()
    }

    /// Number of ancestors of `id`; 0 for the root.
    #[must_use]
    pub fn depth(&self, id: GroupId) -> usize {
        std::iter::successors(self.parent(id), |&p| self.parent(p)).count()
    }

    /// Whether no bracket pair was found at all.
    #[must_use]
    pub fn no_groups_found(&self) -> bool {
        self.groups.len() == 1
    }

    /// Whether some group was still open at end of file.
    #[must_use]
    pub fn early_eof(&self) -> bool {
        self.early_eof
    }

    /// The innermost group whose `[open, close]` range contains `place`.
    #[must_use]
    pub fn find_group_for_place(&self, place: Place) -> GroupId {
        let mut current = GroupId::ROOT;
        while let Some((_, &child)) = self.get(current).children.range(..=place).next_back() {
            if !self.get(child).contains(place) {
                break;
            }
            current = child;
        }
        current
    }

    /// The sibling of `id` that closes exactly at `place`, if it is the
    /// sibling immediately before `id`.
    #[must_use]
    pub fn previous_sibling_closing_at(&self, id: GroupId, place: Place) -> Option<GroupId> {
        let group = self.get(id);
        let parent = self.get(group.parent?);
        let (_, &sibling) = parent.children.range(..group.open).next_back()?;
        (self.get(sibling).close == place).then_some(sibling)
    }

    /// The sibling immediately after `id`.
    #[must_use]
    pub fn next_sibling(&self, id: GroupId) -> Option<GroupId> {
        use std::ops::Bound::{Excluded, Unbounded};

        let group = self.get(id);
        let parent = self.get(group.parent?);
        parent
            .children
            .range((Excluded(group.open), Unbounded))
            .next()
            .map(|(_, &sibling)| sibling)
    }

    /// Visits every group in pre-order, root first.
    pub fn walk(&self, mut visit: impl FnMut(GroupId, &Group)) {
        let mut stack = vec![GroupId::ROOT];
        while let Some(id) = stack.pop() {
            let group = self.get(id);
            visit(id, group);
            stack.extend(group.children().rev());
        }
    }
}
