//! Title length: over the hard maximum, or under the optimal minimum.

use super::{issue, TitleRule, TitleRules, TitleText, PENALTY_TOO_LONG, PENALTY_TOO_SHORT};
use crate::{Issue, Rule};

/// Rule for titles outside the recommended length window
pub struct LengthRule;

impl LengthRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LengthRule {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleRule for LengthRule {
    fn rules(&self) -> &'static [Rule] {
        &[Rule::TooLong, Rule::TooShort]
    }

    fn check(&self, title: &TitleText<'_>, limits: &TitleRules) -> Vec<Issue> {
        // Over-long is checked first so the two never fire together
        if title.length > limits.max_length {
            vec![issue(
                Rule::TooLong,
                format!("Exceeds {} chars ({})", limits.max_length, title.length),
                PENALTY_TOO_LONG,
            )]
        } else if title.length < limits.optimal_min {
            vec![issue(
                Rule::TooShort,
                format!(
                    "Under optimal length ({} < {})",
                    title.length, limits.optimal_min
                ),
                PENALTY_TOO_SHORT,
            )]
        } else {
            vec![]
        }
    }
}
