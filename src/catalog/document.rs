use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::record::ProductRecord;

/// The three layouts the catalog file is published in.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<Value>),
    Wrapped { products: Vec<Value> },
    Keyed(Map<String, Value>),
}

pub(super) fn parse_records(raw: &str) -> Result<Vec<ProductRecord>> {
    let document: CatalogDocument =
        serde_json::from_str(raw).with_context(|| "failed to parse catalog JSON")?;

    let entries: Vec<(Option<String>, Value)> = match document {
        CatalogDocument::List(items) | CatalogDocument::Wrapped { products: items } => {
            items.into_iter().map(|item| (None, item)).collect()
        }
        CatalogDocument::Keyed(map) => map.into_iter().map(|(key, item)| (Some(key), item)).collect(),
    };

    let mut records = Vec::with_capacity(entries.len());
    for (index, (key, item)) in entries.into_iter().enumerate() {
        let Value::Object(map) = item else {
            warn!(index, key = key.as_deref().unwrap_or(""), "skipping catalog entry that is not an object");
            continue;
        };
        match ProductRecord::from_map(map, key.as_deref()) {
            Some(record) => records.push(record),
            None => warn!(index, "skipping catalog record without identifier"),
        }
    }
    Ok(records)
}
