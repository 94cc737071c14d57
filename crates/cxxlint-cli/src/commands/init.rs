//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# cxxlint configuration

# Rule set: "recommended", "strict" or "minimal"
preset = "recommended"

# Lowest severity that makes `cxxlint check` exit with status 1
fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/build/**",
    "**/third_party/**",
]

# File extensions treated as C++ sources
extensions = ["h", "hh", "hpp", "hxx", "inl", "c", "cc", "cpp", "cxx"]

# Respect .gitignore files
respect_gitignore = true

[scrub]
# Lines longer than this are reported by source-hygiene
max_line_length = 79

# Extra leading words that mark a wrapped assertion macro
# assert_markers = ["MY_ASSERT"]

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.routine-length]
enabled = true
# severity = "error"  # Override default severity
max_lines = 150
allow_in_tests = true

# [rules.nesting-depth]
# enabled = true
# max_depth = 5

# [rules.strange-context]
# ignore_macros = ["BEGIN_MESSAGE_MAP"]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("cxxlint.toml"), force)?;

    println!("Created cxxlint.toml");
    println!("\nNext steps:");
    println!("  1. Edit cxxlint.toml to configure rules");
    println!("  2. Run: cxxlint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}
