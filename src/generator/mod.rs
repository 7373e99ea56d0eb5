//! Variant generator - composes and scores candidate titles for a product

pub mod formula;

pub use formula::{FormulaSpec, Layout, FORMULAS};

use crate::analyzer::TitleAnalyzer;
use crate::{Product, TitleVariant};

/// Generates one scored variant per qualifying formula
pub struct VariantGenerator {
    analyzer: TitleAnalyzer,
}

impl VariantGenerator {
    /// Create a generator with the default title rules
    pub fn new() -> Self {
        Self {
            analyzer: TitleAnalyzer::new(),
        }
    }

    /// Score with a configured analyzer; its max length also bounds truncation
    pub fn with_analyzer(analyzer: TitleAnalyzer) -> Self {
        Self { analyzer }
    }

    pub fn analyzer(&self) -> &TitleAnalyzer {
        &self.analyzer
    }

    /// Generate variants in formula order. Products without usable attributes yield none.
    pub fn generate(&self, product: &Product) -> Vec<TitleVariant> {
        let max_length = self.analyzer.limits().max_length;

        FORMULAS
            .iter()
            .filter_map(|spec| {
                let Some(composed) = spec.compose(product) else {
                    tracing::trace!(product = %product.id, formula = %spec.formula, "formula skipped");
                    return None;
                };
                let title = truncate_chars(&composed, max_length);
                let analysis = self.analyzer.analyze(&title);
                Some(TitleVariant {
                    formula: spec.formula,
                    description: spec.formula.description().to_string(),
                    score: analysis.score,
                    issues: analysis.issues,
                    length: analysis.length,
                    title,
                })
            })
            .collect()
    }
}

impl Default for VariantGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// First `max` characters of `s`; may cut mid-word
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}
