//! Context types for rule execution.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::place::Place;
use crate::types::Location;

/// Role of a source file, inferred from its path.
///
/// Only a handful of policy switches depend on it: test drivers get the
/// extended assertion-marker vocabulary, and rules may skip them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    /// `.h`, `.hh`, `.hpp`, `.hxx`, `.inl`.
    Header,
    /// Any other translation unit.
    Implementation,
    /// A test driver (`*.t.cpp`, `*_test.cpp`, files under `tests/`, ...).
    TestDriver,
}

const HEADER_EXTENSIONS: &[&str] = &["h", "hh", "hpp", "hxx", "inl"];

impl FileKind {
    /// Infers the file kind from path conventions.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        for component in path.components() {
            if let std::path::Component::Normal(s) = component {
                let s = s.to_string_lossy();
                if s == "tests" || s == "test" {
                    return Self::TestDriver;
                }
            }
        }

        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            let stem = file_name.split('.').next().unwrap_or(file_name);
            if file_name.contains(".t.")
                || stem.ends_with("_test")
                || stem.ends_with("_unittest")
                || stem.starts_with("test_")
            {
                return Self::TestDriver;
            }
        }

        let is_header = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| HEADER_EXTENSIONS.contains(&ext));
        if is_header {
            Self::Header
        } else {
            Self::Implementation
        }
    }

    /// Returns true for test drivers.
    #[must_use]
    pub fn is_test(self) -> bool {
        self == Self::TestDriver
    }
}

/// Context provided to per-file rules.
///
/// Contains metadata about the file being analyzed that rules can use
/// to make context-aware decisions (e.g., skip checks in test drivers).
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as text (invalid UTF-8 replaced).
    pub content: &'a str,
    /// Header, implementation file or test driver.
    pub kind: FileKind,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    ///
    /// A leading byte order mark is dropped, as the scrubber drops it, so
    /// that offsets and columns agree.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);
        Self {
            path,
            content,
            kind: FileKind::from_path(path),
            relative_path,
        }
    }

    /// Location of a cursor position, with a one-byte span for rendering.
    #[must_use]
    pub fn location(&self, place: Place) -> Location {
        let location = Location::from_place(self.relative_path.clone(), place);
        let offset = self.offset_for(location.line, location.column);
        location.with_span(offset, 1)
    }

    /// Calculates byte offset for a given line and column.
    ///
    /// # Arguments
    ///
    /// * `line` - 1-indexed line number
    /// * `column` - 1-indexed column number
    ///
    /// # Returns
    ///
    /// Byte offset from the start of the file, or 0 if out of bounds.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        if line == 0 {
            return 0;
        }

        let mut offset = 0;
        for (i, line_content) in self.content.split('\n').enumerate() {
            if i + 1 == line {
                return offset + column.saturating_sub(1).min(line_content.len());
            }
            offset += line_content.len() + 1; // +1 for newline
        }

        offset
    }
}
