//! JSON reporter for machine-readable output

use super::{AggregateStats, ProductReport};
use crate::TitleAnalysis;
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Report a single product as JSON
    pub fn report(&self, report: &ProductReport) -> String {
        self.to_json(report, "{}")
    }

    /// Report multiple products as a JSON array
    pub fn report_many(&self, reports: &[ProductReport]) -> String {
        self.to_json(&reports, "[]")
    }

    /// Report products with summary
    pub fn report_with_summary(&self, reports: &[ProductReport], stats: &AggregateStats) -> String {
        let output = JsonOutput {
            products: reports,
            summary: stats,
        };
        self.to_json(&output, "{}")
    }

    /// Report title analyses as a JSON array
    pub fn report_analyses(&self, analyses: &[TitleAnalysis]) -> String {
        self.to_json(&analyses, "[]")
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        json.unwrap_or_else(|_| fallback.to_string())
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    products: &'a [ProductReport],
    summary: &'a AggregateStats,
}
