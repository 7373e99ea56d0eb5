//! Console reporter with colored output

use super::{AggregateStats, ProductReport, VariantReport};
use crate::analyzer::scoring::ScoreCalculator;
use crate::{QualityBand, TitleAnalysis};
use colored::{ColoredString, Colorize};
use std::fmt::Write;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single product with all its variants
    pub fn report(&self, report: &ProductReport) {
        print!("{}", self.render(report));
    }

    /// Report multiple products with summary
    pub fn report_many(&self, reports: &[ProductReport], stats: &AggregateStats) {
        for report in reports {
            self.report(report);
            println!("{}", "─".repeat(60));
        }
        print!("{}", self.render_summary(stats));
    }

    /// Report in quiet mode (one line per product)
    pub fn report_quiet(&self, report: &ProductReport) {
        println!("{}", self.render_quiet(report));
    }

    /// Report a standalone title analysis
    pub fn report_analysis(&self, analysis: &TitleAnalysis) {
        print!("{}", self.render_analysis(analysis));
    }

    pub fn render(&self, report: &ProductReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            self.bold(&format!(
                "Product: {}",
                report.title.as_deref().unwrap_or("(untitled)")
            ))
        );
        let _ = writeln!(
            out,
            "   ID: {} | Brand: {} | Type: {}",
            report.product_id,
            report.brand.as_deref().unwrap_or("-"),
            report.product_type.as_deref().unwrap_or("-")
        );
        let _ = writeln!(
            out,
            "   Color: {} | Size: {}",
            report.color.as_deref().unwrap_or("-"),
            report.size.as_deref().unwrap_or("-")
        );
        let _ = writeln!(out);

        if report.variants.is_empty() {
            let _ = writeln!(
                out,
                "   {} No variants: needs a brand and a title, or three of brand, product type, color, size, material",
                self.paint("⚠", |s| s.yellow())
            );
        }
        for variant in &report.variants {
            self.render_variant(&mut out, variant);
        }

        if let Some(ref winner) = report.winner {
            let _ = writeln!(
                out,
                "   {} {}",
                self.paint("★", |s| s.green().bold()),
                self.bold(&format!(
                    "Winner: {} (CTR: {:.2}%)",
                    winner.formula, winner.ctr
                ))
            );
        }
        out
    }

    fn render_variant(&self, out: &mut String, report: &VariantReport) {
        let variant = &report.variant;
        let score = format!("{}/100", variant.score);
        let _ = writeln!(
            out,
            "   {} {} {} {}",
            self.band_marker(report.band),
            self.bold(&variant.formula.to_string()),
            self.colorize_band(report.band, &score),
            self.dimmed(&format!("{} | {} chars", variant.description, variant.length))
        );
        let _ = writeln!(out, "     {}", variant.title);
        for issue in &variant.issues {
            if self.verbose {
                let _ = writeln!(
                    out,
                    "     {} [{}] {} (-{})",
                    self.paint("→", |s| s.dimmed()),
                    issue.rule,
                    issue.message,
                    issue.penalty
                );
            } else {
                let _ = writeln!(out, "     {} {}", self.paint("→", |s| s.dimmed()), issue.message);
            }
        }
        let metrics = report.metrics;
        let _ = writeln!(
            out,
            "     Impressions: {} | Clicks: {} | Conversions: {} | CTR: {:.2}%",
            metrics.impressions, metrics.clicks, metrics.conversions, report.ctr
        );
        let _ = writeln!(out);
    }

    pub fn render_quiet(&self, report: &ProductReport) -> String {
        let best = report
            .variants
            .iter()
            .max_by(|a, b| {
                a.variant
                    .score
                    .cmp(&b.variant.score)
                    // Earlier formula wins ties
                    .then_with(|| b.variant.formula.cmp(&a.variant.formula))
            });
        match best {
            Some(best) => {
                let score = best.variant.score.to_string();
                let mut line = format!(
                    "{}: {} variants, best {} ({})",
                    report.product_id,
                    report.variants.len(),
                    self.colorize_band(best.band, &score),
                    best.variant.formula
                );
                if let Some(ref winner) = report.winner {
                    let _ = write!(line, ", winner {} ({:.2}%)", winner.formula, winner.ctr);
                }
                line
            }
            None => format!("{}: no variants", report.product_id),
        }
    }

    pub fn render_analysis(&self, analysis: &TitleAnalysis) -> String {
        let band = QualityBand::from_score(analysis.score);
        let score = format!("{}/100", analysis.score);
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.bold(&format!("Title: {}", analysis.title)));
        let _ = writeln!(
            out,
            "   {} Score: {} | {} chars",
            self.band_marker(band),
            self.colorize_band(band, &score),
            analysis.length
        );
        let _ = writeln!(
            out,
            "   {}",
            self.dimmed(ScoreCalculator::band_description(band))
        );
        if analysis.issues.is_empty() {
            let _ = writeln!(out, "   {} No issues", self.paint("✓", |s| s.green()));
        }
        for issue in &analysis.issues {
            let _ = writeln!(
                out,
                "   {} [{}] {} (-{})",
                self.paint("✗", |s| s.red()),
                issue.rule,
                issue.message,
                issue.penalty
            );
        }
        out
    }

    pub fn render_summary(&self, stats: &AggregateStats) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(out, "{}", self.bold("Summary"));
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(out, "   Products:            {}", stats.products);
        let _ = writeln!(out, "   Variants:            {}", stats.variants);
        if stats.without_variants > 0 {
            let _ = writeln!(out, "   Without variants:    {}", stats.without_variants);
        }
        let average = stats.average_best_score.to_string();
        let _ = writeln!(
            out,
            "   Average best score:  {}",
            self.colorize_band(QualityBand::from_score(stats.average_best_score), &average)
        );
        let _ = writeln!(out, "   Winners:             {}", stats.winners);
        let _ = writeln!(out);
        out
    }

    fn band_marker(&self, band: QualityBand) -> String {
        match band {
            QualityBand::Good => self.paint("●", |s| s.green()),
            QualityBand::Fair => self.paint("●", |s| s.yellow()),
            QualityBand::Poor => self.paint("●", |s| s.red()),
        }
    }

    fn colorize_band(&self, band: QualityBand, text: &str) -> String {
        match band {
            QualityBand::Good => self.paint(text, |s| s.green().bold()),
            QualityBand::Fair => self.paint(text, |s| s.yellow()),
            QualityBand::Poor => self.paint(text, |s| s.red().bold()),
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(text, |s| s.bold())
    }

    fn dimmed(&self, text: &str) -> String {
        self.paint(text, |s| s.dimmed())
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> ColoredString) -> String {
        if self.use_colors {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
