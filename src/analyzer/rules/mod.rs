//! Title quality rules

pub mod all_caps;
pub mod avoid_words;
pub mod exclamation;
pub mod length;

pub use all_caps::AllCapsRule;
pub use avoid_words::AvoidWordsRule;
pub use exclamation::ExclamationRule;
pub use length::LengthRule;

use crate::{Issue, Rule};
use serde::{Deserialize, Serialize};

pub const PENALTY_TOO_LONG: u8 = 30;
pub const PENALTY_TOO_SHORT: u8 = 10;
pub const PENALTY_AVOID_WORD: u8 = 15;
pub const PENALTY_ALL_CAPS: u8 = 10;
pub const PENALTY_EXCLAMATION: u8 = 5;

/// Titles this short are never flagged as all caps
pub const ALL_CAPS_MIN_LENGTH: usize = 10;

/// Limits and word list the rules check against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TitleRules {
    /// Hard maximum; generated titles are truncated to this many characters
    pub max_length: usize,
    /// Titles shorter than this are under the optimal length
    pub optimal_min: usize,
    /// Promotional words, matched as lower-case substrings
    pub avoid_words: Vec<String>,
}

impl Default for TitleRules {
    fn default() -> Self {
        Self {
            max_length: 150,
            optimal_min: 70,
            avoid_words: [
                "sale",
                "free shipping",
                "best",
                "cheap",
                "buy now",
                "new",
                "hot",
                "!",
            ]
            .iter()
            .map(|w| w.to_string())
            .collect(),
        }
    }
}

/// A title prepared once for all rules
#[derive(Debug)]
pub struct TitleText<'a> {
    pub raw: &'a str,
    pub lower: String,
    /// Length in characters
    pub length: usize,
}

impl<'a> TitleText<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            raw,
            lower: raw.to_lowercase(),
            length: raw.chars().count(),
        }
    }
}

/// Trait for title rules
pub trait TitleRule: Send + Sync {
    /// Rule ids this check can raise
    fn rules(&self) -> &'static [Rule];

    /// Check a title and return the issues found, in report order
    fn check(&self, title: &TitleText<'_>, limits: &TitleRules) -> Vec<Issue>;
}

pub(crate) fn issue(rule: Rule, message: String, penalty: u8) -> Issue {
    Issue {
        rule,
        message,
        penalty,
    }
}

/// The rule set in report order
pub fn default_rules() -> Vec<Box<dyn TitleRule>> {
    vec![
        Box::new(LengthRule::new()),
        Box::new(AvoidWordsRule::new()),
        Box::new(AllCapsRule::new()),
        Box::new(ExclamationRule::new()),
    ]
}
