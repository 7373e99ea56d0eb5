//! titlelab: Shopping title optimizer
//!
//! This library scores product titles against Google Shopping title rules,
//! generates alternative titles from product attributes using a fixed set of
//! composition formulas, and picks a winning variant from click-through data.

pub mod analyzer;
pub mod catalog;
pub mod config;
pub mod export;
pub mod generator;
pub mod logging;
pub mod reporter;
pub mod session;
pub mod tracker;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

pub use analyzer::{TitleAnalysis, TitleAnalyzer, TitleRules};
pub use generator::VariantGenerator;
pub use tracker::{select_winner, PerformanceCounters, VariantMetrics, Winner};

/// Score a title with the default rule set.
pub fn analyze(title: &str) -> TitleAnalysis {
    TitleAnalyzer::new().analyze(title)
}

/// Generate the scored title variants for a product with the default rule set.
pub fn generate(product: &Product) -> Vec<TitleVariant> {
    VariantGenerator::new().generate(product)
}

/// A product record loaded from a feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique id within the catalog
    pub id: String,
    /// Raw attribute values keyed by lower-cased column name. Empty values are never stored.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl Product {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style setter. Empty or whitespace-only values are treated as absent.
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: &str) {
        let value = value.trim();
        let name = name.trim().to_lowercase();
        if value.is_empty() {
            self.fields.remove(&name);
        } else {
            self.fields.insert(name, value.to_string());
        }
    }

    /// Raw field lookup by column name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Recognized attribute lookup; `product_type` falls back to `google_product_category`
    pub fn attribute(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::ProductType => self
                .get(attribute.key())
                .or_else(|| self.get("google_product_category")),
            _ => self.get(attribute.key()),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.attribute(Attribute::Title)
    }
}

/// Product attributes the generator composes titles from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Title,
    Brand,
    Color,
    Size,
    Material,
    ProductType,
}

impl Attribute {
    pub fn key(&self) -> &'static str {
        match self {
            Attribute::Title => "title",
            Attribute::Brand => "brand",
            Attribute::Color => "color",
            Attribute::Size => "size",
            Attribute::Material => "material",
            Attribute::ProductType => "product_type",
        }
    }
}

/// Title composition formulas, in generation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Formula {
    #[serde(rename = "Brand First")]
    BrandFirst,
    #[serde(rename = "Product First")]
    ProductFirst,
    #[serde(rename = "Attribute Rich")]
    AttributeRich,
    #[serde(rename = "Compact")]
    Compact,
    #[serde(rename = "SEO Natural")]
    SeoNatural,
}

impl Formula {
    pub const ALL: [Formula; 5] = [
        Formula::BrandFirst,
        Formula::ProductFirst,
        Formula::AttributeRich,
        Formula::Compact,
        Formula::SeoNatural,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Formula::BrandFirst => "Brand First",
            Formula::ProductFirst => "Product First",
            Formula::AttributeRich => "Attribute Rich",
            Formula::Compact => "Compact",
            Formula::SeoNatural => "SEO Natural",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Formula::BrandFirst => "Google recommended structure",
            Formula::ProductFirst => "Product name leading",
            Formula::AttributeRich => "Maximum attributes",
            Formula::Compact => "Space-efficient format",
            Formula::SeoNatural => "Natural language format",
        }
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error for formula names that match none of the known formulas
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown formula '{0}' (expected one of: Brand First, Product First, Attribute Rich, Compact, SEO Natural)")]
pub struct UnknownFormula(pub String);

impl FromStr for Formula {
    type Err = UnknownFormula;

    /// Accepts display names and kebab/snake case, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        Formula::ALL
            .into_iter()
            .find(|f| f.name().replace(' ', "").to_lowercase() == normalized)
            .ok_or_else(|| UnknownFormula(s.to_string()))
    }
}

/// Title rules that can raise issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// Title longer than the maximum length
    TooLong,
    /// Title shorter than the optimal minimum
    TooShort,
    /// Promotional or banned word present
    AvoidWord,
    /// Title written entirely in capitals
    AllCaps,
    /// Exclamation marks present
    Exclamation,
}

impl Rule {
    pub const ALL: [Rule; 5] = [
        Rule::TooLong,
        Rule::TooShort,
        Rule::AvoidWord,
        Rule::AllCaps,
        Rule::Exclamation,
    ];
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::TooLong => write!(f, "too-long"),
            Rule::TooShort => write!(f, "too-short"),
            Rule::AvoidWord => write!(f, "avoid-word"),
            Rule::AllCaps => write!(f, "all-caps"),
            Rule::Exclamation => write!(f, "exclamation"),
        }
    }
}

/// An issue found while scoring a title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Rule that raised this issue
    pub rule: Rule,
    /// Human-readable message
    pub message: String,
    /// Points subtracted from the score
    pub penalty: u8,
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// One generated candidate title for a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleVariant {
    pub formula: Formula,
    /// Composed title, truncated to the maximum length
    pub title: String,
    pub description: String,
    /// Quality score (0-100)
    pub score: u8,
    pub issues: Vec<Issue>,
    /// Character count of the stored title
    pub length: usize,
}

impl TitleVariant {
    pub fn band(&self) -> QualityBand {
        QualityBand::from_score(self.score)
    }

    /// Issue messages joined with "; ", or "None" when the title is clean
    pub fn issues_summary(&self) -> String {
        summarize_issues(&self.issues)
    }
}

pub fn summarize_issues(issues: &[Issue]) -> String {
    if issues.is_empty() {
        "None".to_string()
    } else {
        issues
            .iter()
            .map(|i| i.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Coarse quality band for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityBand {
    Good,
    Fair,
    Poor,
}

impl QualityBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => QualityBand::Good,
            70..=89 => QualityBand::Fair,
            _ => QualityBand::Poor,
        }
    }
}

impl std::fmt::Display for QualityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityBand::Good => write!(f, "good"),
            QualityBand::Fair => write!(f, "fair"),
            QualityBand::Poor => write!(f, "poor"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_ignores_empty_values() {
        let product = Product::new("p1")
            .with("Brand", "  Nike ")
            .with("color", "   ")
            .with("size", "");
        assert_eq!(product.get("brand"), Some("Nike"));
        assert_eq!(product.get("color"), None);
        assert!(!product.fields.contains_key("size"));
    }

    #[test]
    fn product_type_falls_back_to_category() {
        let product = Product::new("p1").with("google_product_category", "Apparel > Shoes");
        assert_eq!(
            product.attribute(Attribute::ProductType),
            Some("Apparel > Shoes")
        );

        let product = product.with("product_type", "Sneakers");
        assert_eq!(product.attribute(Attribute::ProductType), Some("Sneakers"));
    }

    #[test]
    fn formula_parses_display_and_cli_names() {
        assert_eq!("Brand First".parse::<Formula>(), Ok(Formula::BrandFirst));
        assert_eq!("seo-natural".parse::<Formula>(), Ok(Formula::SeoNatural));
        assert_eq!("ATTRIBUTE_RICH".parse::<Formula>(), Ok(Formula::AttributeRich));
        assert_eq!("compact".parse::<Formula>(), Ok(Formula::Compact));
        assert!("Cheapest First".parse::<Formula>().is_err());
    }

    #[test]
    fn formula_serializes_as_display_name() {
        let json = serde_json::to_string(&Formula::SeoNatural).unwrap();
        assert_eq!(json, "\"SEO Natural\"");
        let back: Formula = serde_json::from_str("\"Product First\"").unwrap();
        assert_eq!(back, Formula::ProductFirst);
    }

    #[test]
    fn formula_order_matches_generation_order() {
        let mut sorted = Formula::ALL;
        sorted.sort();
        assert_eq!(sorted, Formula::ALL);
    }

    #[test]
    fn quality_band_thresholds() {
        assert_eq!(QualityBand::from_score(100), QualityBand::Good);
        assert_eq!(QualityBand::from_score(90), QualityBand::Good);
        assert_eq!(QualityBand::from_score(89), QualityBand::Fair);
        assert_eq!(QualityBand::from_score(70), QualityBand::Fair);
        assert_eq!(QualityBand::from_score(69), QualityBand::Poor);
        assert_eq!(QualityBand::from_score(0), QualityBand::Poor);
    }

    #[test]
    fn issues_summary_none_when_clean() {
        assert_eq!(summarize_issues(&[]), "None");
        let issues = vec![
            Issue {
                rule: Rule::TooShort,
                message: "Under optimal length (4 < 70)".to_string(),
                penalty: 10,
            },
            Issue {
                rule: Rule::AvoidWord,
                message: "Contains \"hot\"".to_string(),
                penalty: 15,
            },
        ];
        assert_eq!(
            summarize_issues(&issues),
            "Under optimal length (4 < 70); Contains \"hot\""
        );
    }
}
