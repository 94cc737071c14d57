//! Rules that surface findings of one pipeline stage.

use cxxlint_core::{Diagnostic, FileContext, SourceFile, Stage, Violation};

/// Lifts every diagnostic of `stage` into a violation of the given rule.
pub(crate) fn stage_violations(
    ctx: &FileContext,
    source: &SourceFile,
    stage: Stage,
    code: &str,
    name: &str,
) -> Vec<Violation> {
    stage_violations_where(ctx, source, stage, code, name, |_| true)
}

/// Like [`stage_violations`], keeping only diagnostics accepted by `keep`.
pub(crate) fn stage_violations_where(
    ctx: &FileContext,
    source: &SourceFile,
    stage: Stage,
    code: &str,
    name: &str,
    keep: impl Fn(&Diagnostic) -> bool,
) -> Vec<Violation> {
    source
        .diagnostics()
        .iter()
        .filter(|d| d.stage == stage && keep(d))
        .map(|d| Violation::from_diagnostic(code, name, ctx.location(d.place), d))
        .collect()
}
