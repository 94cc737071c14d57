//! Shared output formatting for lint results.

use anyhow::Result;
use cxxlint_core::{LintResult, Severity, ViolationDiagnostic};
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` resolves the relative paths in violations for the `pretty`
/// format, which quotes the offending source.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Pretty => print_pretty(result, root),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();

    for violation in &result.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!("  {}: {}", severity_indicator, violation.message);
        if let Some(suggestion) = &violation.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    print_summary(summary_color, errors, warnings, infos, result);
}

fn print_summary(color: &str, errors: usize, warnings: usize, infos: usize, result: &LintResult) {
    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        color, errors, warnings, infos, result.files_checked
    );
    if result.files_skipped > 0 {
        println!("\x1b[33mSkipped {} unreadable file(s)\x1b[0m", result.files_skipped);
    }
}

fn print_pretty(result: &LintResult, root: &Path) {
    for violation in &result.violations {
        let path = root.join(&violation.location.file);
        match std::fs::read(&path) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                let source = text.strip_prefix('\u{feff}').unwrap_or(&text).to_string();
                let report = miette::Report::new(ViolationDiagnostic::new(violation, source));
                println!("{report:?}");
            }
            Err(e) => {
                tracing::debug!("Cannot quote {}: {}", path.display(), e);
                println!("{violation}\n");
            }
        }
    }

    let (errors, warnings, infos) = result.count_by_severity();
    print_summary("", errors, warnings, infos, result);
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!(
            "{}:{}:{}: {} [{}] {}",
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
            violation.severity,
            violation.code,
            violation.message,
        );
    }
}
