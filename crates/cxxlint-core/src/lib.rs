//! # cxxlint-core
//!
//! Heuristic structural analysis of C++ source, without a compiler.
//!
//! Each file goes through a fixed pipeline:
//!
//! - [`Lines`] scrubs the text: literals and comments are blanked, dead
//!   preprocessor regions removed, and every line gets a statement type
//! - [`GroupTree`] matches `()` and `{}` into a tree of groups, recovering
//!   from mismatched brackets
//! - the classifier labels each group with a [`GroupType`]
//!
//! [`SourceFile`] holds the result and is what [`Rule`]s inspect. The
//! [`Analyzer`] walks a source tree and runs rules over every file.
//!
//! ## Example
//!
//! ```ignore
//! use cxxlint_core::{Analyzer, Rule, Severity};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod diagnostics;
mod place;
mod rule;
mod source;
mod types;

/// Bracket groups, the tree that holds them, and their classification.
pub mod group;
/// Line buffer, scrubber and per-line tables.
pub mod lines;
/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, ALLOW_WITHOUT_REASON};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{FileContext, FileKind};
pub use diagnostics::{Diagnostic, DiagnosticSink, Stage};
pub use group::{Group, GroupId, GroupTree, GroupType};
pub use lines::{Lines, ScrubOptions};
pub use place::Place;
pub use rule::{Rule, RuleBox};
pub use source::SourceFile;
pub use types::{
    Label, LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic,
};
pub use utils::allowance::AllowCheck;
