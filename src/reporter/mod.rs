//! Reporter module for output formatting

pub mod console;
pub mod json;

pub use console::ConsoleReporter;
pub use json::JsonReporter;

use crate::session::ProductEntry;
use crate::tracker::{VariantMetrics, Winner};
use crate::{Attribute, Formula, QualityBand, TitleVariant};
use serde::Serialize;

/// A product with its variants and counters, ready for output
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReport {
    pub product_id: String,
    pub title: Option<String>,
    pub brand: Option<String>,
    pub product_type: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub variants: Vec<VariantReport>,
    pub best_score: Option<u8>,
    pub winner: Option<Winner<Formula>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantReport {
    #[serde(flatten)]
    pub variant: TitleVariant,
    pub band: QualityBand,
    pub metrics: VariantMetrics,
    pub ctr: f64,
}

impl ProductReport {
    pub fn from_entry(entry: &ProductEntry) -> Self {
        let product = &entry.product;
        let owned = |attribute| product.attribute(attribute).map(str::to_string);
        Self {
            product_id: product.id.clone(),
            title: owned(Attribute::Title),
            brand: owned(Attribute::Brand),
            product_type: owned(Attribute::ProductType),
            color: owned(Attribute::Color),
            size: owned(Attribute::Size),
            variants: entry
                .variants
                .iter()
                .map(|variant| {
                    let metrics = entry.metrics(variant.formula);
                    VariantReport {
                        band: variant.band(),
                        ctr: metrics.ctr(),
                        metrics,
                        variant: variant.clone(),
                    }
                })
                .collect(),
            best_score: entry.best_score(),
            winner: entry.winner(),
        }
    }

    /// Whether the best variant scores below `threshold`. Products without variants count as failing.
    pub fn below_threshold(&self, threshold: u8) -> bool {
        self.best_score.map_or(true, |score| score < threshold)
    }
}

/// Aggregate statistics over a set of product reports
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub products: usize,
    pub variants: usize,
    /// Products with no qualifying formula
    pub without_variants: usize,
    /// Mean of each product's best score, over products with variants
    pub average_best_score: u8,
    pub winners: usize,
}

pub fn aggregate_stats(reports: &[ProductReport]) -> AggregateStats {
    let best: Vec<u32> = reports
        .iter()
        .filter_map(|r| r.best_score.map(u32::from))
        .collect();
    let average_best_score = if best.is_empty() {
        0
    } else {
        (best.iter().sum::<u32>() / best.len() as u32) as u8
    };

    AggregateStats {
        products: reports.len(),
        variants: reports.iter().map(|r| r.variants.len()).sum(),
        without_variants: reports.len() - best.len(),
        average_best_score,
        winners: reports.iter().filter(|r| r.winner.is_some()).count(),
    }
}
