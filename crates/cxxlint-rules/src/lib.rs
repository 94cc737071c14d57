//! # cxxlint-rules
//!
//! Built-in structural rules for cxxlint.
//!
//! Every rule works on the classified group tree of a
//! [`SourceFile`](cxxlint_core::SourceFile); none of them re-parses the
//! source.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | CX001 | `bracket-structure` | Unmatched, mismatched and unclosed brackets |
//! | CX002 | `strange-context` | Brackets in a context the classifier does not recognize |
//! | CX003 | `source-hygiene` | Tabs, long lines, unterminated literals and comments |
//! | CX004 | `routine-length` | Routine bodies longer than `max_lines` |
//! | CX005 | `nesting-depth` | Code blocks nested deeper than `max_depth` in a routine |
//!
//! ## Usage
//!
//! ```ignore
//! use cxxlint_core::Analyzer;
//! use cxxlint_rules::{BracketStructure, RoutineLength};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(BracketStructure::new())
//!     .rule(RoutineLength::new().max_lines(100))
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bracket_structure;
mod nesting_depth;
mod presets;
mod routine_length;
mod source_hygiene;
mod stage;
mod strange_context;

pub use bracket_structure::BracketStructure;
pub use nesting_depth::NestingDepth;
pub use presets::{
    all_rules, minimal_rules, recommended_rules, rule_by_name, rules_for_config, strict_rules,
    Preset,
};
pub use routine_length::RoutineLength;
pub use source_hygiene::SourceHygiene;
pub use strange_context::StrangeContext;

/// Re-export core types for convenience.
pub use cxxlint_core::{Rule, Severity, Violation};
