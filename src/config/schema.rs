//! Config schema and deserialization

use crate::analyzer::{TitleAnalyzer, TitleRules};
use crate::Rule;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rule toggle (on, off)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSetting {
    On,
    /// Disable the rule entirely
    Off,
}

/// Partial title limits; unset fields fall back to the defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleRulesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimal_min: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avoid_words: Option<Vec<String>>,
}

impl TitleRulesConfig {
    pub fn resolve(&self) -> TitleRules {
        let defaults = TitleRules::default();
        TitleRules {
            max_length: self.max_length.unwrap_or(defaults.max_length),
            optimal_min: self.optimal_min.unwrap_or(defaults.optimal_min),
            avoid_words: self
                .avoid_words
                .clone()
                .unwrap_or(defaults.avoid_words),
        }
    }

    fn merge_from(&mut self, base: TitleRulesConfig) {
        if self.max_length.is_none() {
            self.max_length = base.max_length;
        }
        if self.optimal_min.is_none() {
            self.optimal_min = base.optimal_min;
        }
        if self.avoid_words.is_none() {
            self.avoid_words = base.avoid_words;
        }
    }
}

/// Root config structure for .titlelabrc.json
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Minimum best-variant score per product (exit 1 if below)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u8>,

    /// Length limits and banned words
    #[serde(default)]
    pub title_rules: TitleRulesConfig,

    /// Per-rule toggles. Key is the rule name in kebab-case.
    #[serde(default)]
    pub rules: HashMap<String, RuleSetting>,

    /// Session file location (relative to the working directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_file: Option<String>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_threshold: Option<u8>) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        self
    }

    /// Rules switched off in config; unknown rule names are an error
    pub fn disabled_rules(&self) -> Result<Vec<Rule>> {
        let mut disabled = Vec::new();
        for (name, setting) in &self.rules {
            let rule = Rule::ALL
                .into_iter()
                .find(|r| r.to_string() == *name)
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "Unknown rule '{}' in config (expected one of: too-long, too-short, avoid-word, all-caps, exclamation)",
                        name
                    )
                })?;
            if *setting == RuleSetting::Off {
                disabled.push(rule);
            }
        }
        Ok(disabled)
    }

    /// Build the analyzer this config describes
    pub fn analyzer(&self) -> Result<TitleAnalyzer> {
        Ok(TitleAnalyzer::new()
            .with_limits(self.title_rules.resolve())
            .without_rules(self.disabled_rules()?))
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.session_file.is_none() {
            self.session_file = base.session_file;
        }

        self.title_rules.merge_from(base.title_rules);

        for (rule, setting) in base.rules {
            self.rules.entry(rule).or_insert(setting);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.title_rules.resolve(), TitleRules::default());
        assert!(config.disabled_rules().unwrap().is_empty());
    }

    #[test]
    fn partial_title_rules() {
        let config: Config =
            serde_json::from_str(r#"{ "titleRules": { "optimalMin": 40 } }"#).unwrap();
        let rules = config.title_rules.resolve();
        assert_eq!(rules.optimal_min, 40);
        assert_eq!(rules.max_length, 150);
        assert_eq!(rules.avoid_words.len(), 8);
    }

    #[test]
    fn rule_toggles() {
        let config: Config = serde_json::from_str(
            r#"{ "rules": { "all-caps": "off", "exclamation": "on" } }"#,
        )
        .unwrap();
        assert_eq!(config.disabled_rules().unwrap(), vec![Rule::AllCaps]);
    }

    #[test]
    fn unknown_rule_is_error() {
        let config: Config =
            serde_json::from_str(r#"{ "rules": { "no-emoji": "off" } }"#).unwrap();
        let err = config.disabled_rules().unwrap_err();
        assert!(err.to_string().contains("no-emoji"));
    }

    #[test]
    fn configured_analyzer_applies_limits_and_toggles() {
        let config: Config = serde_json::from_str(
            r#"{ "titleRules": { "optimalMin": 5 }, "rules": { "avoid-word": "off" } }"#,
        )
        .unwrap();
        let analysis = config.analyzer().unwrap().analyze("Best Boots");
        assert!(analysis.issues.is_empty());
        assert_eq!(analysis.score, 100);
    }

    #[test]
    fn cli_threshold_wins() {
        let config = Config {
            threshold: Some(70),
            ..Config::default()
        };
        assert_eq!(config.clone().merge_with_cli(Some(90)).threshold, Some(90));
        assert_eq!(config.merge_with_cli(None).threshold, Some(70));
    }
}
