//! Promotional words that Shopping listings should not carry.
//! Matching is a plain lower-case substring test, so "new" also matches "Newton".

use super::{issue, TitleRule, TitleRules, TitleText, PENALTY_AVOID_WORD};
use crate::{Issue, Rule};

/// Rule for banned promotional words
pub struct AvoidWordsRule;

impl AvoidWordsRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AvoidWordsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleRule for AvoidWordsRule {
    fn rules(&self) -> &'static [Rule] {
        &[Rule::AvoidWord]
    }

    fn check(&self, title: &TitleText<'_>, limits: &TitleRules) -> Vec<Issue> {
        limits
            .avoid_words
            .iter()
            .filter(|word| !word.is_empty() && title.lower.contains(&word.to_lowercase()))
            .map(|word| {
                issue(
                    Rule::AvoidWord,
                    format!("Contains \"{}\"", word),
                    PENALTY_AVOID_WORD,
                )
            })
            .collect()
    }
}
