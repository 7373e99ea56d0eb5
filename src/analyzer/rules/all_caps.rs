//! Titles shouted in capitals.

use super::{issue, TitleRule, TitleRules, TitleText, ALL_CAPS_MIN_LENGTH, PENALTY_ALL_CAPS};
use crate::{Issue, Rule};

/// Rule for all-caps titles
pub struct AllCapsRule;

impl AllCapsRule {
    pub fn new() -> Self {
        Self
    }

    /// True when the text has at least one cased character and every cased
    /// character is upper-case. Titlecase letters such as `ǅ` are cased but not upper.
    fn is_upper(text: &str) -> bool {
        let mut has_cased = false;
        for c in text.chars() {
            if c.is_lowercase() || c.to_uppercase().ne(std::iter::once(c)) {
                return false;
            }
            if c.is_uppercase() {
                has_cased = true;
            }
        }
        has_cased
    }
}

impl Default for AllCapsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleRule for AllCapsRule {
    fn rules(&self) -> &'static [Rule] {
        &[Rule::AllCaps]
    }

    fn check(&self, title: &TitleText<'_>, _limits: &TitleRules) -> Vec<Issue> {
        if title.length > ALL_CAPS_MIN_LENGTH && Self::is_upper(title.raw) {
            vec![issue(
                Rule::AllCaps,
                "Avoid ALL CAPS".to_string(),
                PENALTY_ALL_CAPS,
            )]
        } else {
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fires(title: &str) -> bool {
        !AllCapsRule::new()
            .check(&TitleText::new(title), &TitleRules::default())
            .is_empty()
    }

    #[test]
    fn flags_long_upper_title() {
        assert!(fires("NIKE RUNNING SHOE - 10"));
    }

    #[test]
    fn ignores_short_upper_title() {
        // exactly 10 characters
        assert!(!fires("NIKE SHOES"));
    }

    #[test]
    fn ignores_mixed_case() {
        assert!(!fires("NIKE Running Shoe"));
    }

    #[test]
    fn needs_a_cased_character() {
        assert!(!fires("1234567890 - 42"));
    }

    #[test]
    fn digits_and_symbols_do_not_break_upper() {
        assert!(AllCapsRule::is_upper("SIZE 10 - 2 PACK"));
        assert!(!AllCapsRule::is_upper("---"));
    }

    #[test]
    fn titlecase_letter_is_not_upper() {
        assert!(!AllCapsRule::is_upper("\u{01C5} ABCDEFGHIJKLMNOP"));
        assert!(!fires("\u{01C5} ABCDEFGHIJKLMNOP"));
        assert!(fires("\u{01C4} ABCDEFGHIJKLMNOP"));
    }
}
