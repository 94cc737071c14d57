//! Tree command: prints the classified group tree of one file.

use anyhow::{Context, Result};
use cxxlint_core::SourceFile;
use std::path::Path;

use crate::config_resolver::{self, ConfigSource};

/// Runs the tree command.
pub fn run(file: &Path, source: &ConfigSource) -> Result<()> {
    let config = config_resolver::load(source)?;
    let analyzed = SourceFile::read(file, &config.scrub)
        .with_context(|| format!("Failed to analyze {}", file.display()))?;

    print!("{}", analyzed.render_tree());
    for d in analyzed.diagnostics() {
        eprintln!(
            "{}:{}: {} ({}): {}",
            file.display(),
            d.place,
            d.severity,
            d.stage,
            d.message
        );
    }
    Ok(())
}
