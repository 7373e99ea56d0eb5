//! Title analyzer - runs every rule over a title

use crate::Issue;
use crate::Rule;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::rules::{default_rules, TitleRule, TitleRules, TitleText};
use super::ScoreCalculator;

/// Result of scoring one title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleAnalysis {
    /// The analyzed title
    pub title: String,
    /// Length in characters
    pub length: usize,
    /// Quality score (0-100)
    pub score: u8,
    /// Issues in report order; empty when no rule fired
    pub issues: Vec<Issue>,
}

/// Scores titles against the title rules. Stateless once built.
pub struct TitleAnalyzer {
    limits: TitleRules,
    rules: Vec<Box<dyn TitleRule>>,
    disabled: HashSet<Rule>,
}

impl TitleAnalyzer {
    /// Create an analyzer with the default limits and every rule enabled
    pub fn new() -> Self {
        Self {
            limits: TitleRules::default(),
            rules: default_rules(),
            disabled: HashSet::new(),
        }
    }

    /// Use custom limits and word list
    pub fn with_limits(mut self, limits: TitleRules) -> Self {
        self.limits = limits;
        self
    }

    /// Drop issues raised by the given rules
    pub fn without_rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.disabled.extend(rules);
        self
    }

    pub fn limits(&self) -> &TitleRules {
        &self.limits
    }

    /// Disabled rules, sorted
    pub fn disabled_rules(&self) -> Vec<Rule> {
        let mut rules: Vec<Rule> = self.disabled.iter().copied().collect();
        rules.sort();
        rules
    }

    /// Score a title
    pub fn analyze(&self, title: &str) -> TitleAnalysis {
        let text = TitleText::new(title);
        let issues: Vec<Issue> = self
            .rules
            .iter()
            .filter(|rule| rule.rules().iter().any(|id| !self.disabled.contains(id)))
            .flat_map(|rule| rule.check(&text, &self.limits))
            .filter(|issue| !self.disabled.contains(&issue.rule))
            .inspect(|issue| tracing::trace!(rule = %issue.rule, "rule fired"))
            .collect();
        let score = ScoreCalculator::calculate(&issues);

        TitleAnalysis {
            title: title.to_string(),
            length: text.length,
            score,
            issues,
        }
    }
}

impl Default for TitleAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(analysis: &TitleAnalysis) -> Vec<&str> {
        analysis.issues.iter().map(|i| i.message.as_str()).collect()
    }

    #[test]
    fn clean_title_scores_full() {
        let title = "Patagonia Better Sweater Fleece Jacket - Mens Classic Fit - Navy Blue - Large";
        let analysis = TitleAnalyzer::new().analyze(title);
        assert_eq!(analysis.length, 77);
        assert_eq!(analysis.score, 100);
        assert!(analysis.issues.is_empty());
    }

    #[test]
    fn promotional_shouting_title() {
        let analysis = TitleAnalyzer::new().analyze("SALE!!! BEST DEAL");
        assert_eq!(
            messages(&analysis),
            vec![
                "Under optimal length (17 < 70)",
                "Contains \"sale\"",
                "Contains \"best\"",
                "Contains \"!\"",
                "Avoid ALL CAPS",
                "Remove exclamation marks",
            ]
        );
        // 100 - 10 - 3*15 - 10 - 5
        assert_eq!(analysis.score, 30);
    }

    #[test]
    fn long_title_loses_thirty() {
        let title = format!("Acme {}", "x".repeat(160));
        let analysis = TitleAnalyzer::new().analyze(&title);
        assert_eq!(analysis.score, 70);
        assert_eq!(messages(&analysis), vec!["Exceeds 150 chars (165)"]);
    }

    #[test]
    fn score_floors_at_zero() {
        let analysis =
            TitleAnalyzer::new().analyze("HOT NEW SALE! BEST CHEAP BUY NOW FREE SHIPPING!");
        assert_eq!(analysis.score, 0);
        // Every triggered issue is still reported
        assert_eq!(analysis.issues.len(), 11);
    }

    #[test]
    fn disabled_rules_do_not_report_or_penalize() {
        let analyzer = TitleAnalyzer::new().without_rules([Rule::TooShort, Rule::Exclamation]);
        let analysis = analyzer.analyze("Boots!");
        assert_eq!(messages(&analysis), vec!["Contains \"!\""]);
        assert_eq!(analysis.score, 85);
    }

    #[test]
    fn rules_declare_every_id_they_raise() {
        let text = TitleText::new("SALE!!! BEST DEAL");
        let limits = TitleRules::default();
        let mut declared: Vec<Rule> = Vec::new();
        for rule in default_rules() {
            for issue in rule.check(&text, &limits) {
                assert!(
                    rule.rules().contains(&issue.rule),
                    "{} raised by a rule that does not declare it",
                    issue.rule
                );
            }
            declared.extend_from_slice(rule.rules());
        }
        declared.sort();
        assert_eq!(declared, Rule::ALL);
    }

    #[test]
    fn fully_disabled_rule_is_skipped() {
        let analyzer = TitleAnalyzer::new().without_rules([Rule::TooLong, Rule::TooShort]);
        let analysis = analyzer.analyze(&"y".repeat(200));
        assert!(analysis.issues.is_empty());
        assert_eq!(analysis.score, 100);
    }

    #[test]
    fn custom_word_list() {
        let analyzer = TitleAnalyzer::new().with_limits(TitleRules {
            avoid_words: vec!["clearance".to_string()],
            optimal_min: 0,
            ..TitleRules::default()
        });
        let analysis = analyzer.analyze("Clearance Best Boots");
        assert_eq!(messages(&analysis), vec!["Contains \"clearance\""]);
        assert_eq!(analysis.score, 85);
    }
}
