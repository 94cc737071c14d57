//! Check command implementation.

use anyhow::{Context, Result};
use cxxlint_core::{Analyzer, Config, RuleBox};
use cxxlint_rules::{rule_by_name, rules_for_config};
use std::path::Path;

use crate::config_resolver::{self, ConfigSource};
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<()> {
    let config = config_resolver::load(source)?;
    let fail_on = config.fail_threshold();

    let rules_to_add = match rules_filter {
        Some(filter) => {
            let names: Vec<&str> = filter.split(',').map(str::trim).collect();
            filter_rules(&names, &config)
        }
        None => rules_for_config(&config),
    };

    let mut builder = Analyzer::builder()
        .root(path)
        .config(config)
        .excludes(exclude);
    for rule in rules_to_add {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, format, analyzer.root())?;

    if result.has_violations_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}

fn filter_rules(names: &[&str], config: &Config) -> Vec<RuleBox> {
    let mut rules = Vec::new();
    for name in names.iter().filter(|n| !n.is_empty()) {
        match rule_by_name(name, config) {
            Some(rule) => rules.push(rule),
            None => tracing::warn!("Unknown rule: {}", name),
        }
    }
    rules
}
