//! Exclamation marks. Independent of the avoid-words list, which also carries "!".

use super::{issue, TitleRule, TitleRules, TitleText, PENALTY_EXCLAMATION};
use crate::{Issue, Rule};

/// Rule for exclamation marks in titles
pub struct ExclamationRule;

impl ExclamationRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExclamationRule {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleRule for ExclamationRule {
    fn rules(&self) -> &'static [Rule] {
        &[Rule::Exclamation]
    }

    fn check(&self, title: &TitleText<'_>, _limits: &TitleRules) -> Vec<Issue> {
        if title.raw.contains('!') {
            vec![issue(
                Rule::Exclamation,
                "Remove exclamation marks".to_string(),
                PENALTY_EXCLAMATION,
            )]
        } else {
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_issue_for_many_marks() {
        let issues =
            ExclamationRule::new().check(&TitleText::new("Wow!!! Boots!"), &TitleRules::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Remove exclamation marks");
        assert_eq!(issues[0].penalty, 5);
    }

    #[test]
    fn clean_title() {
        let issues =
            ExclamationRule::new().check(&TitleText::new("Plain boots"), &TitleRules::default());
        assert!(issues.is_empty());
    }
}
