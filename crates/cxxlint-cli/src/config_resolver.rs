//! Locating the `cxxlint.toml` that governs a path.
//!
//! C++ trees are often checked from a subdirectory, or one file at a time,
//! so the project file is searched for the way `.clang-format` is: from the
//! directory of the checked path upwards, stopping at the repository root
//! (the first directory holding `.git`). Order of precedence:
//!
//! 1. `--config PATH`
//! 2. the nearest `cxxlint.toml` or `.cxxlint.toml` above the path
//! 3. `$CXXLINT_CONFIG_DIR/config.toml`, else `~/.cxxlint/config.toml`
//! 4. built-in defaults

use anyhow::{Context, Result};
use cxxlint_core::Config;
use std::path::{Path, PathBuf};

/// File names recognized in a project directory, most preferred first.
const PROJECT_FILES: [&str; 2] = ["cxxlint.toml", ".cxxlint.toml"];

/// Where the configuration for a run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`; not checked for existence here.
    Explicit(PathBuf),
    /// Nearest project file above the checked path.
    Project(PathBuf),
    /// Per-user file.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

/// Resolves the configuration for checking `target`, a file or directory.
#[must_use]
pub fn resolve(target: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_with(target, explicit, user_config_dir().as_deref())
}

fn resolve_with(target: &Path, explicit: Option<&Path>, user_dir: Option<&Path>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }
    if let Some(found) = nearest_project_file(&search_start(target)) {
        return ConfigSource::Project(found);
    }
    user_dir
        .map(|dir| dir.join("config.toml"))
        .filter(|file| file.is_file())
        .map_or(ConfigSource::Default, ConfigSource::Global)
}

/// Directory the upward search begins in.
fn search_start(target: &Path) -> PathBuf {
    let absolute = std::fs::canonicalize(target).unwrap_or_else(|_| target.to_path_buf());
    if absolute.is_dir() {
        return absolute;
    }
    match absolute.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Walks from `dir` towards the filesystem root, giving up after the
/// repository root.
fn nearest_project_file(dir: &Path) -> Option<PathBuf> {
    for ancestor in dir.ancestors() {
        let found = PROJECT_FILES
            .iter()
            .map(|name| ancestor.join(name))
            .find(|candidate| candidate.is_file());
        if let Some(file) = found {
            tracing::debug!("Using project config {}", file.display());
            return Some(file);
        }
        if ancestor.join(".git").exists() {
            tracing::debug!("No project config below {}", ancestor.display());
            break;
        }
    }
    None
}

/// Reads and parses the file a [`ConfigSource`] names.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load(source: &ConfigSource) -> Result<Config> {
    match source {
        ConfigSource::Default => {
            tracing::debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        ConfigSource::Global(path) => {
            tracing::info!("Using user config: {}", path.display());
            read(path)
        }
        ConfigSource::Explicit(path) | ConfigSource::Project(path) => read(path),
    }
}

fn read(path: &Path) -> Result<Config> {
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

/// `$CXXLINT_CONFIG_DIR`, else `~/.cxxlint`.
fn user_config_dir() -> Option<PathBuf> {
    std::env::var_os("CXXLINT_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|home| home.join(".cxxlint")))
}
