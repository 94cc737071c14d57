//! Per-file analysis context.
//!
//! A [`SourceFile`] owns everything derived from one file: the scrubbed
//! lines, the group tree, its classification and the diagnostics raised
//! along the way. Dropping it releases the whole analysis.

use std::fmt::Write as _;
use std::path::Path;

use tracing::debug;

use crate::analyzer::AnalyzerError;
use crate::context::FileKind;
use crate::diagnostics::Diagnostic;
use crate::group::{Classification, Classifier, Group, GroupId, GroupTree, GroupType};
use crate::lines::{Lines, ScrubOptions};
use crate::place::Place;

/// A scrubbed, built and classified source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    kind: FileKind,
    lines: Lines,
    tree: GroupTree,
    classes: Classification,
    diagnostics: Vec<Diagnostic>,
}

impl SourceFile {
    /// Runs the whole pipeline over in-memory content.
    #[must_use]
    pub fn analyze(content: &str, kind: FileKind, options: &ScrubOptions) -> Self {
        let mut diagnostics = Vec::new();
        let lines = Lines::scrub(content, kind, options, &mut diagnostics);
        let tree = GroupTree::build(&lines, &mut diagnostics);
        let classes = Classifier::new(&lines, &tree).classify_all(&mut diagnostics);

        debug!(
            groups = tree.len(),
            diagnostics = diagnostics.len(),
            "analyzed source"
        );
        Self {
            kind,
            lines,
            tree,
            classes,
            diagnostics,
        }
    }

    /// Reads a file and analyzes it. Invalid UTF-8 is replaced, not rejected.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Read`] if the file cannot be read.
    pub fn read(path: &Path, options: &ScrubOptions) -> Result<Self, AnalyzerError> {
        let bytes = std::fs::read(path).map_err(|source| AnalyzerError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8_lossy(&bytes);
        Ok(Self::analyze(&content, FileKind::from_path(path), options))
    }

    /// Kind of file the pipeline ran with.
    #[must_use]
    pub fn file_kind(&self) -> FileKind {
        self.kind
    }

    /// Scrubbed lines and per-line tables.
    #[must_use]
    pub fn lines(&self) -> &Lines {
        &self.lines
    }

    /// The group tree.
    #[must_use]
    pub fn tree(&self) -> &GroupTree {
        &self.tree
    }

    /// Looks up a group.
    #[must_use]
    pub fn group(&self, id: GroupId) -> &Group {
        self.tree.get(id)
    }

    /// Semantic role of a group.
    #[must_use]
    pub fn kind(&self, id: GroupId) -> GroupType {
        self.classes.kind(id)
    }

    /// Captured class, namespace or enum name.
    #[must_use]
    pub fn class_name(&self, id: GroupId) -> Option<&str> {
        self.classes.name(id)
    }

    /// Innermost group containing `place`.
    #[must_use]
    pub fn find_group_for_place(&self, place: Place) -> GroupId {
        self.tree.find_group_for_place(place)
    }

    /// Visits every group in pre-order with its classification.
    pub fn walk(&self, mut visit: impl FnMut(GroupId, &Group, GroupType)) {
        self.tree
            .walk(|id, group| visit(id, group, self.classes.kind(id)));
    }

    /// Every diagnostic from scrubbing, building and classifying, in order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Indented dump of the classified tree, one group per line.
    #[must_use]
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        self.walk(|id, group, kind| {
            let indent = "  ".repeat(self.tree.depth(id));
            let _ = write!(out, "{indent}{kind}");
            if group.parent().is_some() {
                let bracket = if group.is_paren() { "()" } else { "{}" };
                let _ = write!(out, " {bracket} {}..{}", group.open(), group.close());
            }
            if !group.prev_word().is_empty() {
                let _ = write!(out, " after {:?}", group.prev_word());
            }
            if let Some(name) = self.class_name(id) {
                let _ = write!(out, " name={name}");
            }
            out.push('\n');
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file() {
        let file = SourceFile::analyze("", FileKind::Implementation, &ScrubOptions::default());
        assert!(file.tree().no_groups_found());
        assert_eq!(file.kind(GroupId::ROOT), GroupType::File);
        assert_eq!(file.render_tree(), "FILE\n");
    }

    #[test]
    fn walk_sees_classifications() {
        let file = SourceFile::analyze(
            "int f() { return g(1); }",
            FileKind::Implementation,
            &ScrubOptions::default(),
        );
        let mut seen = Vec::new();
        file.walk(|_, _, kind| seen.push(kind));
        assert_eq!(
            seen,
            vec![
                GroupType::File,
                GroupType::RoutineDecl,
                GroupType::RoutineBody,
                GroupType::RoutineCall,
            ]
        );
    }

    #[test]
    fn read_reports_missing_file() {
        let err = SourceFile::read(Path::new("/nonexistent/x.cpp"), &ScrubOptions::default())
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::Read { .. }));
    }

    #[test]
    fn read_infers_kind_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widget.t.cpp");
        std::fs::write(&path, "int main() { ASSERT(1); }\n").unwrap();
        let file = SourceFile::read(&path, &ScrubOptions::default()).unwrap();
        assert_eq!(file.file_kind(), FileKind::TestDriver);
        assert!(file.diagnostics().is_empty());
    }
}
