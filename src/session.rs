//! Optimization session - the caller-owned state around the pure core
//!
//! Holds the loaded products, their generated variants and per-variant
//! counters, and persists them as JSON between CLI runs. Products are
//! fingerprinted (SHA-256 of their fields) so re-loading an unchanged feed
//! keeps the counters collected so far.

use crate::catalog::Catalog;
use crate::export::ExportRow;
use crate::generator::VariantGenerator;
use crate::tracker::{PerformanceCounters, VariantMetrics, Winner};
use crate::{Formula, Product, TitleVariant};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use thiserror::Error;

const SESSION_VERSION: u32 = 1;
pub const DEFAULT_SESSION_FILE: &str = ".titlelab-session.json";

/// Catalogs larger than this are generated on the rayon pool
const PARALLEL_THRESHOLD: usize = 10;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("session file {path} is not valid: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("session file version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },
    #[error("unknown product '{0}' (run generate first)")]
    UnknownProduct(String),
    #[error("product '{product}' has no {formula} variant")]
    UnknownVariant { product: String, formula: Formula },
}

/// Everything tracked for one product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEntry {
    pub product: Product,
    /// SHA-256 of the product fields the variants were generated from
    pub fingerprint: String,
    pub variants: Vec<TitleVariant>,
    pub counters: PerformanceCounters,
    /// RFC 3339 time the variants were generated
    pub generated_at: String,
}

impl ProductEntry {
    fn generate(product: &Product, fingerprint: String, generator: &VariantGenerator) -> Self {
        let variants = generator.generate(product);
        let counters = PerformanceCounters::zeroed(variants.iter().map(|v| v.formula));
        Self {
            product: product.clone(),
            fingerprint,
            variants,
            counters,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Highest variant score, if any variant exists
    pub fn best_score(&self) -> Option<u8> {
        self.variants.iter().map(|v| v.score).max()
    }

    pub fn winner(&self) -> Option<Winner<Formula>> {
        self.counters.winner()
    }

    pub fn metrics(&self, formula: Formula) -> VariantMetrics {
        self.counters.get(formula).copied().unwrap_or_default()
    }
}

/// A catalog position during sync: a kept entry or a product to generate
enum Slot<'a> {
    Kept(ProductEntry),
    Stale(&'a Product, String),
}

/// Outcome of syncing a catalog into the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    /// Products whose variants were (re)generated and counters reset
    pub generated: usize,
    /// Products kept as they were
    pub unchanged: usize,
    /// Products dropped because they left the feed
    pub removed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    version: u32,
    /// Feed the products were last loaded from
    #[serde(default)]
    pub feed: Option<String>,
    /// Fingerprint of the rule settings the variants were scored with
    #[serde(default)]
    rules_fingerprint: String,
    #[serde(default)]
    entries: Vec<ProductEntry>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            version: SESSION_VERSION,
            feed: None,
            rules_fingerprint: String::new(),
            entries: Vec::new(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a session file; a missing file is an empty session
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no session file, starting empty");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let session: Session =
            serde_json::from_str(&content).map_err(|source| SessionError::Corrupt {
                path: path.display().to_string(),
                source,
            })?;

        if session.version != SESSION_VERSION {
            return Err(SessionError::VersionMismatch {
                found: session.version,
                expected: SESSION_VERSION,
            });
        }

        Ok(session)
    }

    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let content = serde_json::to_string_pretty(self).map_err(|source| {
            SessionError::Corrupt {
                path: path.display().to_string(),
                source,
            }
        })?;
        fs::write(path, content).map_err(|source| SessionError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// SHA-256 over the product id and its fields in key order
    pub fn fingerprint(product: &Product) -> String {
        let mut hasher = Sha256::new();
        hasher.update(product.id.as_bytes());
        for (name, value) in &product.fields {
            hasher.update([0x1f]);
            hasher.update(name.as_bytes());
            hasher.update([0x1e]);
            hasher.update(value.as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    fn rules_fingerprint(generator: &VariantGenerator) -> String {
        let analyzer = generator.analyzer();
        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_vec(analyzer.limits()).unwrap_or_default());
        for rule in analyzer.disabled_rules() {
            hasher.update(rule.to_string().as_bytes());
            hasher.update([0x1f]);
        }
        hex::encode(hasher.finalize())
    }

    /// Bring the session in line with a freshly loaded catalog.
    ///
    /// New and changed products are regenerated with zeroed counters, unchanged
    /// ones keep their variants and counters (unless `force`), and products no
    /// longer in the catalog are dropped. Entries end up in catalog order.
    pub fn sync_catalog(
        &mut self,
        catalog: &Catalog,
        generator: &VariantGenerator,
        force: bool,
    ) -> SyncSummary {
        let rules_fingerprint = Self::rules_fingerprint(generator);
        let rules_changed = rules_fingerprint != self.rules_fingerprint;
        if rules_changed && !self.entries.is_empty() {
            tracing::debug!("title rules changed, regenerating every product");
        }

        let mut previous: std::collections::HashMap<String, ProductEntry> = self
            .entries
            .drain(..)
            .map(|e| (e.product.id.clone(), e))
            .collect();

        let mut summary = SyncSummary::default();
        let mut slots: Vec<Slot<'_>> = Vec::with_capacity(catalog.len());
        for product in &catalog.products {
            let fingerprint = Self::fingerprint(product);
            match previous.remove(&product.id) {
                Some(entry) if !force && !rules_changed && entry.fingerprint == fingerprint => {
                    summary.unchanged += 1;
                    slots.push(Slot::Kept(entry));
                }
                _ => {
                    summary.generated += 1;
                    slots.push(Slot::Stale(product, fingerprint));
                }
            }
        }
        summary.removed = previous.len();

        let generate_slot = |slot: Slot<'_>| match slot {
            Slot::Kept(entry) => entry,
            Slot::Stale(product, fingerprint) => {
                ProductEntry::generate(product, fingerprint, generator)
            }
        };
        self.entries = if slots.len() > PARALLEL_THRESHOLD {
            slots.into_par_iter().map(generate_slot).collect()
        } else {
            slots.into_iter().map(generate_slot).collect()
        };
        self.rules_fingerprint = rules_fingerprint;

        tracing::debug!(
            generated = summary.generated,
            unchanged = summary.unchanged,
            removed = summary.removed,
            "synced catalog"
        );
        summary
    }

    /// Replace one product's variants and reset its counters
    pub fn regenerate(
        &mut self,
        product_id: &str,
        generator: &VariantGenerator,
    ) -> Result<&ProductEntry, SessionError> {
        let entry = self.entry_mut(product_id)?;
        let fingerprint = Self::fingerprint(&entry.product);
        *entry = ProductEntry::generate(&entry.product, fingerprint, generator);
        Ok(entry)
    }

    /// Overwrite the counters of one variant
    pub fn record(
        &mut self,
        product_id: &str,
        formula: Formula,
        metrics: VariantMetrics,
    ) -> Result<(), SessionError> {
        let entry = self.entry_mut(product_id)?;
        if !entry.counters.contains(formula) {
            return Err(SessionError::UnknownVariant {
                product: product_id.to_string(),
                formula,
            });
        }
        entry.counters.record(formula, metrics);
        Ok(())
    }

    pub fn winner(&self, product_id: &str) -> Result<Option<Winner<Formula>>, SessionError> {
        Ok(self.entry(product_id)?.winner())
    }

    pub fn entry(&self, product_id: &str) -> Result<&ProductEntry, SessionError> {
        self.entries
            .iter()
            .find(|e| e.product.id == product_id)
            .ok_or_else(|| SessionError::UnknownProduct(product_id.to_string()))
    }

    fn entry_mut(&mut self, product_id: &str) -> Result<&mut ProductEntry, SessionError> {
        self.entries
            .iter_mut()
            .find(|e| e.product.id == product_id)
            .ok_or_else(|| SessionError::UnknownProduct(product_id.to_string()))
    }

    /// Entries in catalog order
    pub fn entries(&self) -> &[ProductEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn variant_count(&self) -> usize {
        self.entries.iter().map(|e| e.variants.len()).sum()
    }

    /// One export row per (product, variant), in catalog and formula order
    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.entries
            .iter()
            .flat_map(|entry| {
                entry.variants.iter().map(move |variant| {
                    ExportRow::new(&entry.product, variant, entry.metrics(variant.formula))
                })
            })
            .collect()
    }
}
