//! Product feed loading (CSV or TSV)
//!
//! The separator is detected from the header line: tab if it contains one,
//! comma otherwise. Column names are trimmed and lower-cased. Rows without an
//! `id` get `product_<row number>`.

use crate::Product;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Feed file extensions accepted by the loader
pub const FEED_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read feed {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed feed: {0}")]
    Parse(#[from] csv::Error),
    #[error("feed has no header row")]
    MissingHeader,
    #[error("duplicate product id '{0}'")]
    DuplicateId(String),
}

/// Field separator of a feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Comma,
    Tab,
}

impl Separator {
    /// Tab when the first line contains one, comma otherwise
    pub fn detect(content: &str) -> Self {
        let first_line = content.lines().next().unwrap_or("");
        if first_line.contains('\t') {
            Separator::Tab
        } else {
            Separator::Comma
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            Separator::Comma => b',',
            Separator::Tab => b'\t',
        }
    }
}

/// Products loaded from one feed, in feed order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub products: Vec<Product>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

/// Read and parse a feed file
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let catalog = parse_catalog(&content)?;
    tracing::debug!(path = %path.display(), products = catalog.len(), "loaded feed");
    Ok(catalog)
}

/// Parse feed text
pub fn parse_catalog(content: &str) -> Result<Catalog, CatalogError> {
    // Excel exports often start with a byte-order mark
    let content = content.trim_start_matches('\u{feff}');
    if content.trim().is_empty() {
        return Err(CatalogError::MissingHeader);
    }

    let separator = Separator::detect(content);
    tracing::trace!(?separator, "detected feed separator");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator.as_byte())
        .flexible(true)
        .from_reader(content.as_bytes());

    // A repeated column keeps its first occurrence; later ones are blanked and skipped
    let mut seen_headers = HashSet::new();
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .map(|h| {
            if h.is_empty() || seen_headers.insert(h.clone()) {
                h
            } else {
                tracing::warn!(column = %h, "duplicate feed column ignored");
                String::new()
            }
        })
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CatalogError::MissingHeader);
    }

    let mut products = Vec::new();
    let mut seen = HashSet::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let mut product = Product::new(String::new());
        for (name, value) in headers.iter().zip(record.iter()) {
            if name.is_empty() || name == "id" {
                continue;
            }
            product.set(name, value);
        }

        let id = headers
            .iter()
            .position(|h| h == "id")
            .and_then(|pos| record.get(pos))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("product_{}", idx + 1));
        if !seen.insert(id.clone()) {
            return Err(CatalogError::DuplicateId(id));
        }
        product.id = id;
        products.push(product);
    }

    Ok(Catalog { products })
}
