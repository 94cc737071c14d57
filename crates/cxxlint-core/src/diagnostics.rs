//! Non-fatal findings produced while scrubbing, building and classifying.
//!
//! Every stage of the pipeline reports into a [`DiagnosticSink`] and keeps
//! going. Turning a [`Diagnostic`] into a user-facing message (file prefix,
//! colors, rule codes) is the job of the rules and the CLI, not of the core.

use crate::place::Place;
use crate::types::Severity;

/// Pipeline stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Quote/comment blanking, preprocessor blanking, line hygiene.
    Scrub,
    /// Bracket matching while building the group tree.
    Build,
    /// Semantic classification of groups.
    Classify,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scrub => write!(f, "scrub"),
            Self::Build => write!(f, "build"),
            Self::Classify => write!(f, "classify"),
        }
    }
}

/// A single finding at a position in the scrubbed buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Where the finding applies.
    pub place: Place,
    /// Structural inconsistencies are errors, failed heuristics warnings.
    pub severity: Severity,
    /// Stage that reported it.
    pub stage: Stage,
    /// Human-readable message, without any location prefix.
    pub message: String,
}

impl Diagnostic {
    /// Creates an error-severity diagnostic.
    #[must_use]
    pub fn error(stage: Stage, place: Place, message: impl Into<String>) -> Self {
        Self {
            place,
            severity: Severity::Error,
            stage,
            message: message.into(),
        }
    }

    /// Creates a warning-severity diagnostic.
    #[must_use]
    pub fn warning(stage: Stage, place: Place, message: impl Into<String>) -> Self {
        Self {
            place,
            severity: Severity::Warning,
            stage,
            message: message.into(),
        }
    }
}

/// Receiver for pipeline diagnostics.
pub trait DiagnosticSink {
    /// Records one diagnostic. Must not fail.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::trace!(
            stage = %diagnostic.stage,
            line = diagnostic.place.line(),
            "{}",
            diagnostic.message
        );
        self.push(diagnostic);
    }
}
