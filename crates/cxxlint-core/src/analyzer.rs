//! Core analyzer for orchestrating lint execution.

use crate::config::{Config, RuleConfig};
use crate::context::FileContext;
use crate::rule::{Rule, RuleBox};
use crate::source::SourceFile;
use crate::types::{LintResult, Severity, Suggestion, Violation};
use crate::utils::allowance::check_allow_with_reason;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Rule name given to allow directives that lack a required reason.
pub const ALLOW_WITHOUT_REASON: &str = "allow-without-reason";

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error outside of reading a source file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A source file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path to the unreadable file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Directory walk error.
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_read_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether an unreadable file aborts the run (default: false).
    #[must_use]
    pub fn fail_on_read_error(mut self, fail: bool) -> Self {
        self.fail_on_read_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be resolved or an
    /// exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let root = self.root.unwrap_or_else(|| config.analyzer.root.clone());

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        if exclude_patterns.is_empty() {
            exclude_patterns.extend(["**/build/**".to_string(), "**/third_party/**".to_string()]);
        }
        let excludes = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Analyzer {
            root,
            rules: self.rules,
            exclude_patterns,
            excludes,
            config,
            fail_on_read_error: self.fail_on_read_error,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    excludes: Vec<glob::Pattern>,
    config: Config,
    fail_on_read_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes every source file under the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory walk fails, or if a file cannot be
    /// read and `fail_on_read_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());
        self.analyze_paths(&files)
    }

    /// Analyzes the given files, in order, as if they had been discovered
    /// under the root.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read and `fail_on_read_error`
    /// is set.
    pub fn analyze_paths(&self, files: &[PathBuf]) -> Result<LintResult, AnalyzerError> {
        let mut result = LintResult::new();
        for file_path in files {
            match self.analyze_file(file_path) {
                Ok(violations) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                }
                Err(AnalyzerError::Read { path, source }) => {
                    warn!("Skipping unreadable file {}: {}", path.display(), source);
                    if self.fail_on_read_error {
                        return Err(AnalyzerError::Read { path, source });
                    }
                    result.files_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        result.violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });

        info!(
            "Analysis complete: {} violations in {} files ({} skipped)",
            result.violations.len(),
            result.files_checked,
            result.files_skipped
        );

        Ok(result)
    }

    /// Analyzes a single file and returns its violations.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Read`] if the file cannot be read.
    pub fn analyze_file(&self, path: &Path) -> Result<Vec<Violation>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let bytes = std::fs::read(path).map_err(|source| AnalyzerError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8_lossy(&bytes);
        let ctx = FileContext::new(path, &content, &self.root);
        let source = SourceFile::analyze(&content, ctx.kind, &self.config.scrub);

        let mut violations = Vec::new();
        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let found = rule.check(&ctx, &source);
            let found = self.apply_allowances(rule.as_ref(), &source, found);
            violations.extend(self.apply_severity_override(rule.name(), found));
        }

        Ok(violations)
    }

    /// Drops violations covered by an allow directive. A directive without
    /// a reason on a rule that requires one leaves a warning behind.
    fn apply_allowances(
        &self,
        rule: &dyn Rule,
        source: &SourceFile,
        violations: Vec<Violation>,
    ) -> Vec<Violation> {
        violations
            .into_iter()
            .filter_map(|v| {
                let check = check_allow_with_reason(source.lines(), v.location.line, rule.name());
                if !check.is_allowed() {
                    return Some(v);
                }
                if rule.requires_allow_reason() && check.reason().is_none() {
                    let message =
                        format!("Allow directive for '{}' is missing required reason", rule.name());
                    return Some(
                        Violation::new(
                            rule.code(),
                            ALLOW_WITHOUT_REASON,
                            Severity::Warning,
                            v.location,
                            message,
                        )
                        .with_suggestion(Suggestion::new(
                            "Add reason=\"...\" to explain why this exception is necessary",
                        )),
                    );
                }
                debug!(rule = rule.name(), line = v.location.line, "violation allowed");
                None
            })
            .collect()
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for v in violations.iter_mut().filter(|v| v.rule == rule_name) {
                v.severity = severity;
            }
        }
        violations
    }

    /// Discovers all C++ source files to analyze.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || !self.has_source_extension(path) {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.config.analyzer.extensions.iter().any(|e| e == ext))
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let options = glob::MatchOptions::new();

        self.excludes.iter().any(|pattern| {
            pattern.matches_path_with(path, options) || pattern.matches_path_with(relative, options)
        })
    }

    /// The exclude patterns in effect.
    #[must_use]
    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude_patterns
    }

    /// Gets the rule configuration for a specific rule.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.config.rules.get(rule_name)
    }
}
