//! TSV export of every generated variant with its counters

use crate::tracker::VariantMetrics;
use crate::{Product, TitleVariant};
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One flat row per (product, variant)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub product_id: String,
    pub original_title: String,
    pub formula: String,
    pub new_title: String,
    pub quality_score: u8,
    pub issues: String,
    pub length: usize,
    pub impressions: u64,
    pub clicks: u64,
    pub ctr: f64,
    pub conversions: u64,
}

impl ExportRow {
    pub fn new(product: &Product, variant: &TitleVariant, metrics: VariantMetrics) -> Self {
        Self {
            product_id: product.id.clone(),
            original_title: product.title().unwrap_or_default().to_string(),
            formula: variant.formula.to_string(),
            new_title: variant.title.clone(),
            quality_score: variant.score,
            issues: variant.issues_summary(),
            length: variant.length,
            impressions: metrics.impressions,
            clicks: metrics.clicks,
            ctr: metrics.ctr(),
            conversions: metrics.conversions,
        }
    }
}

/// `shopping_titles_YYYYmmdd_HHMMSS.tsv` for the given time
pub fn export_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("shopping_titles_{}.tsv", at.format("%Y%m%d_%H%M%S"))
}

/// Write rows as tab-separated text with a header line
pub fn write_tsv<W: Write>(rows: &[ExportRow], writer: W) -> Result<()> {
    let mut tsv = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_writer(writer);
    if rows.is_empty() {
        // serialize() only emits the header alongside the first record
        tsv.write_record([
            "product_id",
            "original_title",
            "formula",
            "new_title",
            "quality_score",
            "issues",
            "length",
            "impressions",
            "clicks",
            "ctr",
            "conversions",
        ])
        .context("Failed to write TSV header")?;
    }
    for row in rows {
        tsv.serialize(row).context("Failed to write TSV row")?;
    }
    tsv.flush().context("Failed to flush TSV output")?;
    Ok(())
}

/// Render rows to a TSV string
pub fn to_tsv(rows: &[ExportRow]) -> Result<String> {
    let mut buf = Vec::new();
    write_tsv(rows, &mut buf)?;
    String::from_utf8(buf).context("TSV output is not valid UTF-8")
}

/// Write a timestamped export file into `dir` and return its path
pub fn export_to_dir(rows: &[ExportRow], dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;
    let path = dir.join(export_file_name(&chrono::Local::now()));
    let file = fs::File::create(&path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    write_tsv(rows, file)?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "wrote export");
    Ok(path)
}
