//! Rule presets for common configurations.

use crate::{BracketStructure, NestingDepth, RoutineLength, SourceHygiene, StrangeContext};
use cxxlint_core::{Config, RuleBox};

/// Preset configurations for cxxlint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Recommended rules with sensible defaults.
    Recommended,
    /// Every rule, with tighter limits.
    Strict,
    /// Bracket structure only, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Looks up a preset by its config name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::Recommended),
            "strict" => Some(Self::Strict),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::Minimal => minimal_rules(),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `bracket-structure` (CX001)
/// - `strange-context` (CX002)
/// - `source-hygiene` (CX003)
/// - `routine-length` (CX004) with a limit of 150 lines
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    vec![
        Box::new(BracketStructure::new()),
        Box::new(StrangeContext::new()),
        Box::new(SourceHygiene::new()),
        Box::new(RoutineLength::new()),
    ]
}

/// Returns the strict set of rules.
///
/// Includes every rule, with test drivers checked too and:
/// - `routine-length` limited to 80 lines
/// - `nesting-depth` (CX005) limited to 4 levels
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    vec![
        Box::new(BracketStructure::new()),
        Box::new(StrangeContext::new()),
        Box::new(SourceHygiene::new()),
        Box::new(RoutineLength::new().max_lines(80).allow_in_tests(false)),
        Box::new(NestingDepth::new().max_depth(4)),
    ]
}

/// Returns the minimal set of rules: `bracket-structure` only.
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    vec![Box::new(BracketStructure::new())]
}

/// Returns all available rules with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(BracketStructure::new()),
        Box::new(StrangeContext::new()),
        Box::new(SourceHygiene::new()),
        Box::new(RoutineLength::new()),
        Box::new(NestingDepth::new()),
    ]
}

/// Builds one rule by name or code, applying its options from `config`.
#[must_use]
pub fn rule_by_name(name: &str, config: &Config) -> Option<RuleBox> {
    let options = |rule: &str| config.rules.get(rule).cloned().unwrap_or_default();
    let rule: RuleBox = match name {
        crate::bracket_structure::NAME | crate::bracket_structure::CODE => {
            Box::new(BracketStructure::new())
        }
        crate::strange_context::NAME | crate::strange_context::CODE => Box::new(
            StrangeContext::from_config(&options(crate::strange_context::NAME)),
        ),
        crate::source_hygiene::NAME | crate::source_hygiene::CODE => Box::new(
            SourceHygiene::new()
                .allow_in_tests(options(crate::source_hygiene::NAME).get_bool("allow_in_tests", false)),
        ),
        crate::routine_length::NAME | crate::routine_length::CODE => Box::new(
            RoutineLength::from_config(&options(crate::routine_length::NAME)),
        ),
        crate::nesting_depth::NAME | crate::nesting_depth::CODE => Box::new(
            NestingDepth::from_config(&options(crate::nesting_depth::NAME)),
        ),
        _ => return None,
    };
    Some(rule)
}

/// Rules selected by a configuration.
///
/// The preset (default: recommended) picks the rule set. A rule with
/// options in `[rules.<name>]` is rebuilt from them, and a rule outside the
/// preset joins it when its section sets `enabled = true`.
#[must_use]
pub fn rules_for_config(config: &Config) -> Vec<RuleBox> {
    let preset = match config.preset.as_deref() {
        None => Preset::Recommended,
        Some(name) => Preset::from_name(name).unwrap_or_else(|| {
            tracing::warn!("Unknown preset '{}', using recommended", name);
            Preset::Recommended
        }),
    };

    let mut rules = preset.rules();
    for rule in &mut rules {
        if config.rules.contains_key(rule.name()) {
            if let Some(configured) = rule_by_name(rule.name(), config) {
                *rule = configured;
            }
        }
    }

    let mut extra: Vec<&String> = config
        .rules
        .iter()
        .filter(|(_, c)| c.enabled == Some(true))
        .map(|(name, _)| name)
        .filter(|name| !rules.iter().any(|r| r.name() == name.as_str()))
        .collect();
    extra.sort();
    for name in extra {
        match rule_by_name(name, config) {
            Some(rule) => rules.push(rule),
            None => tracing::warn!("Unknown rule in config: {}", name),
        }
    }

    rules
}
