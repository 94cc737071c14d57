//! Semantic classification of groups.
//!
//! Each group is classified at most once. Deciding a group may first
//! classify its parent or the sibling just before it; results are cached
//! per [`GroupId`], so the outcome never depends on traversal order.

use tracing::{debug, trace};

use super::{Group, GroupId, GroupTree, GroupType};
use crate::diagnostics::{Diagnostic, DiagnosticSink, Stage};
use crate::lines::{Lines, StatementType};
use crate::place::Place;

/// Words before `(` that introduce an expression rather than a call.
const EXPRESSION_KEYWORDS: &[&str] = &[
    "return",
    "sizeof",
    "alignof",
    "decltype",
    "typeid",
    "new",
    "delete",
    "case",
    "__attribute__",
    "alignas",
    "co_return",
    "co_await",
];

/// Words between `)` and `{` that mark a routine definition.
const ROUTINE_MARKERS: &[&str] = &[
    "const",
    "override",
    "final",
    "noexcept",
    "mutable",
    "volatile",
    "NOEXCEPT",
];

/// Words that take a parenthesized argument inside a class head.
const HEAD_ATTRIBUTES: &[&str] = &["alignas", "__declspec", "__attribute__"];

/// Bytes before an empty word that put a `(` in expression context.
fn is_expression_context(b: u8) -> bool {
    matches!(
        b,
        b'=' | b'+'
            | b'-'
            | b'*'
            | b'/'
            | b'%'
            | b'^'
            | b'&'
            | b'|'
            | b'!'
            | b'~'
            | b'<'
            | b'>'
            | b'?'
            | b':'
            | b','
            | b';'
            | b'"'
            | b'\''
            | b'('
            | b'['
            | b'{'
    )
}

fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// The position just past a word that starts at `at`.
fn after(at: Place, word: &str) -> Place {
    Place::new(at.line(), at.col() + word.len())
}

/// Final result of classifying every group of a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    kinds: Vec<GroupType>,
    names: Vec<Option<String>>,
}

impl Classification {
    /// Semantic role of a group.
    #[must_use]
    pub fn kind(&self, id: GroupId) -> GroupType {
        self.kinds
            .get(id.index())
            .copied()
            .unwrap_or(GroupType::Unknown)
    }

    /// Captured name of a class, namespace or enum group.
    #[must_use]
    pub fn name(&self, id: GroupId) -> Option<&str> {
        self.names.get(id.index()).and_then(Option::as_deref)
    }
}

/// Memoizing classifier over one tree.
pub struct Classifier<'a> {
    lines: &'a Lines,
    tree: &'a GroupTree,
    kinds: Vec<Option<GroupType>>,
    names: Vec<Option<String>>,
}

impl<'a> Classifier<'a> {
    /// Creates a classifier with an empty cache.
    #[must_use]
    pub fn new(lines: &'a Lines, tree: &'a GroupTree) -> Self {
        Self {
            lines,
            tree,
            kinds: vec![None; tree.len()],
            names: vec![None; tree.len()],
        }
    }

    /// Classifies one group, and whatever it depends on, on demand.
    pub fn classify(&mut self, id: GroupId, sink: &mut dyn DiagnosticSink) -> GroupType {
        if let Some(kind) = self.kinds[id.index()] {
            return kind;
        }
        let (kind, name) = self.decide(id, sink);
        trace!(group = %id, kind = %kind, "classified group");
        self.kinds[id.index()] = Some(kind);
        self.names[id.index()] = name;
        kind
    }

    /// Classifies every group.
    pub fn classify_all(mut self, sink: &mut dyn DiagnosticSink) -> Classification {
        for id in self.tree.ids() {
            self.classify(id, sink);
        }
        let kinds: Vec<GroupType> = self
            .kinds
            .into_iter()
            .map(|k| k.unwrap_or(GroupType::Unknown))
            .collect();
        debug!(
            groups = kinds.len(),
            unknown = kinds.iter().filter(|&&k| k == GroupType::Unknown).count(),
            "classified group tree"
        );
        Classification {
            kinds,
            names: self.names,
        }
    }

    fn decide(&mut self, id: GroupId, sink: &mut dyn DiagnosticSink) -> (GroupType, Option<String>) {
        let tree = self.tree;
        let group = tree.get(id);
        let Some(parent) = group.parent() else {
            return (GroupType::File, None);
        };
        if group.is_paren() {
            (self.decide_paren(id, group, parent, sink), None)
        } else {
            self.decide_brace(id, group, parent, sink)
        }
    }

    fn decide_paren(
        &mut self,
        id: GroupId,
        group: &Group,
        parent: GroupId,
        sink: &mut dyn DiagnosticSink,
    ) -> GroupType {
        let word = group.prev_word();
        let keyword = match word {
            "if" | "while" | "for" => Some(GroupType::IfWhileFor),
            "switch" => Some(GroupType::SwitchParens),
            "catch" | "__except" => Some(GroupType::CatchParens),
            "asm" | "__asm" | "__asm__" => Some(GroupType::Asm),
            "throw" | "noexcept" => Some(GroupType::ThrowParens),
            w if EXPRESSION_KEYWORDS.contains(&w) => Some(GroupType::ExpressionParens),
            _ => None,
        };
        if let Some(kind) = keyword {
            let needs_code_body = matches!(
                kind,
                GroupType::IfWhileFor | GroupType::SwitchParens | GroupType::CatchParens
            );
            if needs_code_body && self.classify(parent, sink).is_declaration_scope() {
                sink.report(Diagnostic::error(
                    Stage::Classify,
                    group.prev_word_begin(),
                    format!("'{word}' outside of a code body"),
                ));
            }
            return kind;
        }

        let (before, before_at) = self.byte_before_word(group);
        if word.is_empty() && is_expression_context(before) {
            return GroupType::ExpressionParens;
        }

        match self.classify(parent, sink) {
            GroupType::Unknown => GroupType::Unknown,
            kind if kind.is_declaration_scope() => self.declaration_parens(id, group, before, before_at),
            // a lambda's parameters, promoted by the body that follows them
            _ if self.opens_definition(id) => GroupType::RoutineDecl,
            _ => GroupType::RoutineCall,
        }
    }

    /// Parentheses directly inside a file, namespace, class or enum.
    fn declaration_parens(&self, id: GroupId, group: &Group, before: u8, before_at: Place) -> GroupType {
        let lines = self.lines;
        let start = group.statement_start();

        let is_clause_separator = before == b','
            || (before == b':' && before_at.prev(lines).get(lines) != b':');
        if is_clause_separator
            && before_at >= start
            && !self.statement_type(start).is_label_context()
        {
            return GroupType::CtorClause;
        }

        let words = self.words_between(start, group.prev_word_begin());
        if words.iter().any(|(w, _)| w == "template" || w == "typedef") {
            return GroupType::RoutineDecl;
        }

        if !self.has_assignment(start, group.prev_word_begin()) || self.opens_definition(id) {
            GroupType::RoutineDecl
        } else {
            GroupType::RoutineCall
        }
    }

    fn decide_brace(
        &mut self,
        id: GroupId,
        group: &Group,
        parent: GroupId,
        sink: &mut dyn DiagnosticSink,
    ) -> (GroupType, Option<String>) {
        let lines = self.lines;
        let tree = self.tree;
        let word = group.prev_word();
        let start = group.statement_start();
        let (before, before_at) = self.byte_before_word(group);
        let parent_kind = self.classify(parent, sink);
        let statement = self.statement_type(start);

        // brace initializers
        if (word.is_empty() && before == b'=')
            || word == "return"
            || (word.is_empty() && matches!(before, b'(' | b',') && tree.get(parent).is_paren())
            || (word.is_empty()
                && matches!(before, b',' | b'{')
                && parent_kind == GroupType::InitBraces)
        {
            return (GroupType::InitBraces, None);
        }

        if statement.is_class_key()
            || matches!(
                statement,
                StatementType::Template | StatementType::Typedef | StatementType::Friend
            )
        {
            if let Some(name) = self.class_head(start, group.open()) {
                return (GroupType::Class, name);
            }
        }

        if matches!(
            statement,
            StatementType::Do
                | StatementType::Else
                | StatementType::Try
                | StatementType::Case
                | StatementType::Default
        ) && (word.is_empty() || matches!(word, "do" | "else" | "try"))
        {
            return (GroupType::CodeBody, None);
        }

        if statement == StatementType::Extern && word.is_empty() && before == b'"' {
            return (GroupType::Namespace, quoted_raw(lines, before_at));
        }

        let words = self.words_between(start, group.open());
        if let Some((_, at)) = words.iter().find(|(w, _)| w == "namespace") {
            let (name, _) = after(*at, "namespace").name_after(lines);
            return (GroupType::Namespace, (!name.is_empty()).then_some(name));
        }

        let is_typedef_enum = statement == StatementType::Typedef
            && words.get(1).is_some_and(|(w, _)| w == "enum");
        if statement == StatementType::Enum || is_typedef_enum {
            return (GroupType::Enum, enum_name(&words));
        }

        if matches!(word, "struct" | "class" | "union") {
            return (GroupType::Class, None);
        }

        if ROUTINE_MARKERS.contains(&word) {
            return (GroupType::RoutineBody, None);
        }

        if word.is_empty() && before == b')' {
            let sibling = tree.previous_sibling_closing_at(id, before_at);
            let kind = sibling.map(|s| self.classify(s, sink));
            match kind {
                Some(
                    GroupType::RoutineCall
                    | GroupType::RoutineDecl
                    | GroupType::CtorClause
                    | GroupType::ThrowParens,
                ) => return (GroupType::RoutineBody, None),
                Some(GroupType::CatchParens | GroupType::IfWhileFor | GroupType::SwitchParens) => {
                    return (GroupType::CodeBody, None)
                }
                _ => {}
            }
        }

        let after_block = word.is_empty() && (before_at.is_rend() || matches!(before, b';' | b'{' | b'}'));
        if after_block && parent_kind.is_executable() {
            return (GroupType::CodeBody, None);
        }

        if word.is_empty() && before == b']' {
            return (GroupType::RoutineBody, None);
        }
        if self.follows_arrow(group, before, before_at) {
            return (GroupType::RoutineBody, None);
        }
        if !word.is_empty() {
            let next = group.close().next(lines).skip_space_forward(lines).get(lines);
            if matches!(next, b';' | b',' | b')') {
                return (GroupType::InitBraces, None);
            }
        }

        let context = if word.is_empty() {
            match before {
                0 => "start of file".to_string(),
                b => format!("'{}'", char::from(b)),
            }
        } else {
            format!("'{word}'")
        };
        sink.report(Diagnostic::warning(
            Stage::Classify,
            group.open(),
            format!("strange context for '{{' after {context}"),
        ));
        (GroupType::Unknown, None)
    }

    /// The nearest non-blank byte before the group's preceding word.
    fn byte_before_word(&self, group: &Group) -> (u8, Place) {
        let lines = self.lines;
        let begin = group.prev_word_begin();
        if group.prev_word().is_empty() {
            return (begin.get(lines), begin);
        }
        let at = begin.prev(lines).skip_space_back(lines);
        (at.get(lines), at)
    }

    fn statement_type(&self, start: Place) -> StatementType {
        let (word, _) = start.name_after(self.lines);
        StatementType::from_keyword(&word)
    }

    /// Identifiers in `[from, to)` with their positions.
    fn words_between(&self, from: Place, to: Place) -> Vec<(String, Place)> {
        let lines = self.lines;
        let mut words = Vec::new();
        let mut p = from;
        while p < to {
            if is_word_start(p.get(lines)) {
                let (word, at) = p.name_after(lines);
                p = after(at, &word);
                words.push((word, at));
            } else {
                p = p.next(lines);
            }
        }
        words
    }

    /// Whether `[from, to)` holds an assignment `=` outside brackets.
    fn has_assignment(&self, from: Place, to: Place) -> bool {
        let lines = self.lines;
        let mut depth = 0usize;
        let mut prev = 0u8;
        let mut p = from;
        while p < to {
            let b = p.get(lines);
            match b {
                b'(' | b'[' => depth += 1,
                b')' | b']' => depth = depth.saturating_sub(1),
                b'=' if depth == 0
                    && !matches!(prev, b'=' | b'!' | b'<' | b'>')
                    && p.next(lines).get(lines) != b'=' =>
                {
                    return true;
                }
                _ => {}
            }
            prev = b;
            p = p.next(lines);
        }
        false
    }

    /// Whether a brace sibling follows these parentheses with nothing but
    /// qualifiers in between, as in `[](int a) {` or `f() const & {`.
    fn opens_definition(&self, id: GroupId) -> bool {
        let lines = self.lines;
        let Some(next) = self.tree.next_sibling(id) else {
            return false;
        };
        let next = self.tree.get(next);
        if next.is_paren() {
            return false;
        }
        let mut p = self.tree.get(id).close().next(lines);
        while p < next.open() {
            let b = p.get(lines);
            let qualifier = is_word_start(b)
                || matches!(b, b' ' | b'\t' | b'\n' | b'&' | b':' | b'<' | b'>' | b'-' | b'*');
            if !qualifier {
                return false;
            }
            p = p.next(lines);
        }
        true
    }

    /// A trailing return type: `-> int {` or `-> std::vector<int> {`.
    fn follows_arrow(&self, group: &Group, before: u8, before_at: Place) -> bool {
        let lines = self.lines;
        let type_begin = if group.prev_word().is_empty() {
            if before != b'>' {
                return false;
            }
            let (name, at) = before_at.template_name_before(lines);
            if name.is_empty() {
                return false;
            }
            at
        } else {
            group.prev_word_begin()
        };
        let gt = type_begin.prev(lines).skip_space_back(lines);
        gt.get(lines) == b'>' && gt.prev(lines).get(lines) == b'-'
    }

    /// Parses a class head between the statement start and `{`.
    ///
    /// Returns `None` when the statement is not a class definition, and
    /// `Some(None)` for an anonymous one.
    fn class_head(&self, start: Place, open: Place) -> Option<Option<String>> {
        let lines = self.lines;
        let (mut word, mut at) = start.name_after(lines);
        loop {
            let next = match word.as_str() {
                "typedef" | "friend" | "export" => after(at, &word).name_after(lines),
                "template" => after(at, &word).template_name_after(lines),
                _ => break,
            };
            (word, at) = next;
            if at >= open {
                return None;
            }
        }
        if !matches!(word.as_str(), "class" | "struct" | "union") {
            return None;
        }

        let mut name = None;
        let mut p = after(at, &word);
        while p < open {
            let b = p.get(lines);
            if is_word_start(b) {
                let (w, w_at) = p.name_after(lines);
                p = after(w_at, &w);
                if HEAD_ATTRIBUTES.contains(&w.as_str()) {
                    p = self.skip_balanced(p, b'(', b')')?;
                } else if !matches!(w.as_str(), "final" | "sealed") {
                    name = Some(w);
                }
                continue;
            }
            match b {
                b':' if p.next(lines).get(lines) == b':' => {
                    p = p.next(lines).next(lines);
                }
                b':' => break,
                b'<' => p = self.skip_balanced(p, b'<', b'>')?,
                b'(' | b')' | b'=' | b';' | b'*' | b'&' => return None,
                _ => p = p.next(lines),
            }
        }
        Some(name)
    }

    /// Position after the closer matching the first `open_byte` at or
    /// after `from`. Fails at a statement delimiter.
    fn skip_balanced(&self, from: Place, open_byte: u8, close_byte: u8) -> Option<Place> {
        let lines = self.lines;
        let mut p = from.skip_space_forward(lines);
        if p.get(lines) != open_byte {
            return Some(p);
        }
        let mut depth = 0usize;
        while !p.is_end(lines) {
            match p.get(lines) {
                b if b == open_byte => depth += 1,
                b if b == close_byte => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(p.next(lines));
                    }
                }
                b';' | b'{' | b'}' => return None,
                _ => {}
            }
            p = p.next(lines);
        }
        None
    }
}

/// The name following `enum`, `enum class` or `enum struct`.
fn enum_name(words: &[(String, Place)]) -> Option<String> {
    let mut rest = words.iter().map(|(w, _)| w.as_str()).skip_while(|&w| w != "enum");
    rest.next()?;
    rest.find(|&w| !matches!(w, "class" | "struct"))
        .map(String::from)
}

/// The raw string literal whose closing quote is at `close`, as in `"C"`.
fn quoted_raw(lines: &Lines, close: Place) -> Option<String> {
    let raw = lines.raw(close.line());
    let open = raw.get(..close.col())?.rfind('"')?;
    raw.get(open..=close.col()).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FileKind;
    use crate::lines::ScrubOptions;

    fn analyze(source: &str) -> (GroupTree, Classification, Vec<Diagnostic>) {
        let mut sink = Vec::new();
        let lines = Lines::scrub(
            source,
            FileKind::Implementation,
            &ScrubOptions::default(),
            &mut sink,
        );
        let tree = GroupTree::build(&lines, &mut sink);
        let classes = Classifier::new(&lines, &tree).classify_all(&mut sink);
        (tree, classes, sink)
    }

    fn kinds(source: &str) -> Vec<(String, GroupType)> {
        let (tree, classes, _) = analyze(source);
        tree.ids()
            .skip(1)
            .map(|id| (tree.get(id).prev_word().to_string(), classes.kind(id)))
            .collect()
    }

    fn pairs(expected: &[(&str, GroupType)]) -> Vec<(String, GroupType)> {
        expected.iter().map(|&(w, k)| (w.to_string(), k)).collect()
    }

    #[test]
    fn routine_with_nested_if() {
        use GroupType::*;
        assert_eq!(
            kinds("void f(int x) { if (cond) { return; } }"),
            pairs(&[
                ("f", RoutineDecl),
                ("", RoutineBody),
                ("if", IfWhileFor),
                ("", CodeBody),
            ])
        );
    }

    #[test]
    fn class_with_copy_constructor() {
        let (tree, classes, diags) = analyze("class Foo { Foo(const Foo& original); };");
        let class = tree.children(tree.root()).next().unwrap();
        let ctor = tree.children(class).next().unwrap();
        assert_eq!(classes.kind(class), GroupType::Class);
        assert_eq!(classes.name(class), Some("Foo"));
        assert_eq!(classes.kind(ctor), GroupType::RoutineDecl);
        assert!(diags.is_empty());
    }

    #[test]
    fn namespaces_extern_and_enums() {
        let source = "namespace a {\nextern \"C\" {\nenum class Color : int { RED, GREEN };\n}\n}\n";
        let (tree, classes, diags) = analyze(source);
        let ids: Vec<GroupId> = tree.ids().skip(1).collect();
        assert_eq!(classes.kind(ids[0]), GroupType::Namespace);
        assert_eq!(classes.name(ids[0]), Some("a"));
        assert_eq!(classes.kind(ids[1]), GroupType::Namespace);
        assert_eq!(classes.name(ids[1]), Some("\"C\""));
        assert_eq!(classes.kind(ids[2]), GroupType::Enum);
        assert_eq!(classes.name(ids[2]), Some("Color"));
        assert!(diags.is_empty());
    }

    #[test]
    fn constructor_initializer_list() {
        use GroupType::*;
        let source = "Foo::Foo(int a)\n    : d_a(a)\n    , d_b(0)\n{\n}\n";
        assert_eq!(
            kinds(source),
            pairs(&[
                ("Foo::Foo", RoutineDecl),
                ("d_a", CtorClause),
                ("d_b", CtorClause),
                ("", RoutineBody),
            ])
        );
    }

    #[test]
    fn access_specifier_is_not_a_ctor_clause() {
        use GroupType::*;
        let source = "class Foo {\n  public:\n    Foo();\n  private: void g();\n};";
        assert_eq!(
            kinds(source),
            pairs(&[("Foo", Class), ("Foo", RoutineDecl), ("g", RoutineDecl)])
        );
    }

    #[test]
    fn initializers_and_lambdas() {
        use GroupType::*;
        let source = "void f() {\n  int a[] = {1, 2};\n  auto g = [](int x) { return x; };\n  Foo foo{1};\n  return {a, {b}};\n}\n";
        assert_eq!(
            kinds(source),
            pairs(&[
                ("f", RoutineDecl),
                ("", RoutineBody),
                ("", InitBraces),
                ("", RoutineDecl),
                ("", RoutineBody),
                ("foo", InitBraces),
                ("return", InitBraces),
                ("", InitBraces),
            ])
        );
    }

    #[test]
    fn control_flow_bodies() {
        use GroupType::*;
        let source = "\
int main() {
  for (int i = 0; i < n; ++i) {
    switch (i) {
      case 1: {
        break;
      }
      default:
        g((i));
    }
  }
  do {
  } while (x);
  try {
  } catch (const E& e) {
  }
  if (a) {
  } else {
  }
}
";
        assert_eq!(
            kinds(source),
            pairs(&[
                ("main", RoutineDecl),
                ("", RoutineBody),
                ("for", IfWhileFor),
                ("", CodeBody),
                ("switch", SwitchParens),
                ("", CodeBody),
                ("", CodeBody),
                ("g", RoutineCall),
                ("", ExpressionParens),
                ("do", CodeBody),
                ("while", IfWhileFor),
                ("try", CodeBody),
                ("catch", CatchParens),
                ("", CodeBody),
                ("if", IfWhileFor),
                ("", CodeBody),
                ("else", CodeBody),
            ])
        );
    }

    #[test]
    fn template_class_and_const_member() {
        let source = "template <class T>\nclass Foo : public Bar<T> {\n  void f() const {\n  }\n};";
        let (tree, classes, diags) = analyze(source);
        let ids: Vec<GroupId> = tree.ids().skip(1).collect();
        assert_eq!(classes.kind(ids[0]), GroupType::Class);
        assert_eq!(classes.name(ids[0]), Some("Foo"));
        assert_eq!(classes.kind(ids[1]), GroupType::RoutineDecl);
        assert_eq!(classes.kind(ids[2]), GroupType::RoutineBody);
        assert!(diags.is_empty());
    }

    #[test]
    fn anonymous_typedef_struct() {
        let (tree, classes, _) = analyze("typedef struct {\n  int a;\n} Point;");
        let id = tree.children(tree.root()).next().unwrap();
        assert_eq!(classes.kind(id), GroupType::Class);
        assert_eq!(classes.name(id), None);
    }

    #[test]
    fn lambda_assignment_at_file_scope_is_a_definition() {
        use GroupType::*;
        assert_eq!(
            kinds("auto cmp = [](int a) {\n  return a;\n};"),
            pairs(&[("", RoutineDecl), ("", RoutineBody)])
        );
        assert_eq!(
            kinds("Foo foo = make(1);"),
            pairs(&[("make", RoutineCall)])
        );
    }

    #[test]
    fn lambda_parameters_in_code_are_declarations() {
        use GroupType::*;
        assert_eq!(
            kinds("void f() {\n  auto g = [](int x) { return x; };\n  h([](int y){ return y; });\n}\n"),
            pairs(&[
                ("f", RoutineDecl),
                ("", RoutineBody),
                ("", RoutineDecl),
                ("", RoutineBody),
                ("h", RoutineCall),
                ("", RoutineDecl),
                ("", RoutineBody),
            ])
        );
    }

    #[test]
    fn class_head_on_previous_lines() {
        let (tree, classes, diags) = analyze("struct Foo\n{\n  int a;\n};\n");
        let class = tree.children(tree.root()).next().unwrap();
        assert_eq!(classes.kind(class), GroupType::Class);
        assert_eq!(classes.name(class), Some("Foo"));
        assert!(diags.is_empty());

        let (tree, classes, diags) =
            analyze("template <class T>\nstruct Foo\n    : Base\n{\n  T d_v;\n};\n");
        let class = tree.children(tree.root()).next().unwrap();
        assert_eq!(classes.kind(class), GroupType::Class);
        assert_eq!(classes.name(class), Some("Foo"));
        assert!(diags.is_empty());
    }

    #[test]
    fn trailing_return_type() {
        use GroupType::*;
        assert_eq!(
            kinds("auto f() -> std::vector<int> {\n}\nauto g() -> int {\n}"),
            pairs(&[
                ("f", RoutineDecl),
                ("", RoutineBody),
                ("g", RoutineDecl),
                ("int", RoutineBody),
            ])
        );
    }

    #[test]
    fn strange_context_is_reported_once() {
        let (tree, classes, diags) = analyze("FOO_BEGIN {\n  bar(1);\n}\n");
        let brace = tree.children(tree.root()).next().unwrap();
        let call = tree.children(brace).next().unwrap();
        assert_eq!(classes.kind(brace), GroupType::Unknown);
        assert_eq!(classes.kind(call), GroupType::Unknown);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].stage, Stage::Classify);
        assert!(diags[0].message.contains("'FOO_BEGIN'"));
    }

    #[test]
    fn keyword_outside_code_body_is_an_error() {
        let (tree, classes, diags) = analyze("if (x) {\n}\n");
        let brace = tree.children(tree.root()).nth(1).unwrap();
        assert_eq!(classes.kind(brace), GroupType::CodeBody);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, crate::Severity::Error);
    }

    #[test]
    fn classification_is_idempotent_and_order_free() {
        let source = "namespace n {\nstruct S {\n  int f(int a) const { return g(a, (a)); }\n};\n}\n";
        let mut sink = Vec::new();
        let lines = Lines::scrub(
            source,
            FileKind::Header,
            &ScrubOptions::default(),
            &mut sink,
        );
        let tree = GroupTree::build(&lines, &mut sink);

        let first = Classifier::new(&lines, &tree).classify_all(&mut Vec::new());
        let second = Classifier::new(&lines, &tree).classify_all(&mut Vec::new());
        assert_eq!(first, second);

        let mut lazy = Classifier::new(&lines, &tree);
        let deepest = tree.ids().last().unwrap();
        assert_eq!(
            lazy.classify(deepest, &mut Vec::new()),
            GroupType::ExpressionParens
        );
        assert_eq!(lazy.classify_all(&mut Vec::new()), first);
    }
}
