//! Performance tracking - per-variant counters, CTR and winner selection

use crate::Formula;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Impression/click/conversion counters for one variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantMetrics {
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
}

impl VariantMetrics {
    pub fn new(impressions: u64, clicks: u64, conversions: u64) -> Self {
        Self {
            impressions,
            clicks,
            conversions,
        }
    }

    /// Click-through rate in percent; 0 when there are no impressions
    pub fn ctr(&self) -> f64 {
        if self.impressions > 0 {
            self.clicks as f64 / self.impressions as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// The selected variant and its CTR
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Winner<K> {
    pub formula: K,
    pub ctr: f64,
}

/// Pick the entry with the strictly highest CTR.
///
/// Ties keep the first entry in iteration order, so the caller's ordering is
/// part of the result. Returns `None` when no entry has a CTR above zero.
pub fn select_winner<'a, K, I>(counters: I) -> Option<Winner<K>>
where
    I: IntoIterator<Item = (K, &'a VariantMetrics)>,
{
    let mut best: Option<Winner<K>> = None;
    let mut max_ctr = 0.0;

    for (formula, metrics) in counters {
        let ctr = metrics.ctr();
        if ctr > max_ctr {
            max_ctr = ctr;
            best = Some(Winner { formula, ctr });
        }
    }

    best
}

/// Counters for every variant of one product, iterated in formula order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerformanceCounters {
    entries: BTreeMap<Formula, VariantMetrics>,
}

impl PerformanceCounters {
    /// Zeroed counters for the given formulas
    pub fn zeroed(formulas: impl IntoIterator<Item = Formula>) -> Self {
        Self {
            entries: formulas
                .into_iter()
                .map(|f| (f, VariantMetrics::default()))
                .collect(),
        }
    }

    pub fn get(&self, formula: Formula) -> Option<&VariantMetrics> {
        self.entries.get(&formula)
    }

    pub fn contains(&self, formula: Formula) -> bool {
        self.entries.contains_key(&formula)
    }

    /// Replace the counters for a formula. Values are taken as given; they need not grow.
    pub fn record(&mut self, formula: Formula, metrics: VariantMetrics) {
        self.entries.insert(formula, metrics);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Formula, &VariantMetrics)> {
        self.entries.iter().map(|(f, m)| (*f, m))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn winner(&self) -> Option<Winner<Formula>> {
        select_winner(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctr_is_percentage() {
        assert_eq!(VariantMetrics::new(100, 10, 1).ctr(), 10.0);
        assert_eq!(VariantMetrics::new(50, 10, 0).ctr(), 20.0);
        assert_eq!(VariantMetrics::new(0, 5, 0).ctr(), 0.0);
    }

    #[test]
    fn highest_ctr_wins() {
        let a = VariantMetrics::new(100, 10, 0);
        let b = VariantMetrics::new(50, 10, 0);
        let winner = select_winner([("A", &a), ("B", &b)]).unwrap();
        assert_eq!(winner.formula, "B");
        assert_eq!(winner.ctr, 20.0);
    }

    #[test]
    fn no_impressions_no_winner() {
        let zero = VariantMetrics::default();
        assert!(select_winner([("A", &zero), ("B", &zero)]).is_none());
    }

    #[test]
    fn zero_clicks_no_winner() {
        let seen = VariantMetrics::new(1000, 0, 0);
        assert!(select_winner([("A", &seen)]).is_none());
    }

    #[test]
    fn empty_input_no_winner() {
        let none: Vec<(&str, &VariantMetrics)> = vec![];
        assert!(select_winner(none).is_none());
    }

    #[test]
    fn tie_keeps_first_seen() {
        let a = VariantMetrics::new(100, 10, 0);
        let b = VariantMetrics::new(200, 20, 0);
        assert_eq!(select_winner([("A", &a), ("B", &b)]).unwrap().formula, "A");
        assert_eq!(select_winner([("B", &b), ("A", &a)]).unwrap().formula, "B");
    }

    #[test]
    fn zero_impression_entry_never_wins() {
        let zero = VariantMetrics::new(0, 3, 0);
        let low = VariantMetrics::new(1000, 1, 0);
        let winner = select_winner([("A", &zero), ("B", &low)]).unwrap();
        assert_eq!(winner.formula, "B");
    }

    #[test]
    fn selection_is_repeatable() {
        let a = VariantMetrics::new(40, 4, 1);
        let b = VariantMetrics::new(30, 6, 2);
        let first = select_winner([("A", &a), ("B", &b)]);
        let second = select_winner([("A", &a), ("B", &b)]);
        assert_eq!(first, second);
    }

    #[test]
    fn counters_iterate_in_formula_order() {
        let counters =
            PerformanceCounters::zeroed([Formula::SeoNatural, Formula::BrandFirst, Formula::Compact]);
        let order: Vec<Formula> = counters.iter().map(|(f, _)| f).collect();
        assert_eq!(
            order,
            vec![Formula::BrandFirst, Formula::Compact, Formula::SeoNatural]
        );
        assert!(counters.iter().all(|(_, m)| *m == VariantMetrics::default()));
    }

    #[test]
    fn record_overwrites() {
        let mut counters = PerformanceCounters::zeroed([Formula::BrandFirst]);
        counters.record(Formula::BrandFirst, VariantMetrics::new(100, 9, 1));
        counters.record(Formula::BrandFirst, VariantMetrics::new(50, 2, 0));
        assert_eq!(
            counters.get(Formula::BrandFirst),
            Some(&VariantMetrics::new(50, 2, 0))
        );
    }

    #[test]
    fn counters_winner_uses_formula_order_for_ties() {
        let mut counters = PerformanceCounters::zeroed(Formula::ALL);
        counters.record(Formula::SeoNatural, VariantMetrics::new(10, 5, 0));
        counters.record(Formula::ProductFirst, VariantMetrics::new(20, 10, 0));
        let winner = counters.winner().unwrap();
        assert_eq!(winner.formula, Formula::ProductFirst);
        assert_eq!(winner.ctr, 50.0);
    }

    #[test]
    fn counters_serialize_keyed_by_formula_name() {
        let mut counters = PerformanceCounters::zeroed([Formula::Compact]);
        counters.record(Formula::Compact, VariantMetrics::new(3, 1, 0));
        let json = serde_json::to_string(&counters).unwrap();
        assert_eq!(
            json,
            r#"{"Compact":{"impressions":3,"clicks":1,"conversions":0}}"#
        );
        let back: PerformanceCounters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, counters);
    }
}
