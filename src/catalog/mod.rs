mod document;
mod record;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

pub use record::{ProductRecord, ProductSummary};

/// Read-only, ordered view of the catalog file.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<ProductRecord>,
}

impl Catalog {
    pub fn new(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        document::parse_records(raw).map(Self::new)
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record whose identifier matches case-insensitively.
    pub fn find(&self, asin: &str) -> Option<&ProductRecord> {
        self.records.iter().find(|record| record.matches(asin))
    }

    pub fn summaries(&self) -> Vec<ProductSummary> {
        self.records.iter().map(ProductRecord::summary).collect()
    }
}
