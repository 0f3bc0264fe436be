use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

const ASIN_KEYS: &[&str] = &["asin", "ASIN"];
const NAME_KEYS: &[&str] = &["name", "title", "product_name"];
const MARKET_KEYS: &[&str] = &["market", "marketplace"];
const CATEGORY_KEYS: &[&str] = &["category", "inferredCategory", "inferred_category"];
const REVIEW_COUNT_KEYS: &[&str] = &["reviewCount", "review_count"];
const MEAN_RATING_KEYS: &[&str] = &["meanRating", "mean_rating"];
const DISAPPOINTMENT_KEYS: &[&str] = &["disappointmentProbability", "disappointment_probability"];

/// One precomputed product entry from the catalog.
///
/// The record is kept exactly as published and serializes back unchanged;
/// the accessors read the handful of fields the comparator needs, tolerating
/// alternate spellings, nulls and loosely typed numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub asin: String,
    raw: Map<String, Value>,
}

impl ProductRecord {
    /// Builds a record from a catalog object. `key` is the object key when the
    /// catalog is keyed by identifier. Returns `None` when no identifier is found.
    pub fn from_map(mut raw: Map<String, Value>, key: Option<&str>) -> Option<Self> {
        let asin = first_string(&raw, ASIN_KEYS)
            .or_else(|| first_string(&raw, &["id"]))
            .or_else(|| key.map(str::trim).filter(|key| !key.is_empty()).map(str::to_string))?;
        if ASIN_KEYS.iter().all(|name| !raw.contains_key(*name)) {
            raw.insert("asin".to_string(), Value::String(asin.clone()));
        }
        Some(Self { asin, raw })
    }

    pub fn matches(&self, asin: &str) -> bool {
        self.asin.eq_ignore_ascii_case(asin.trim())
    }

    pub fn name(&self) -> Option<String> {
        first_string(&self.raw, NAME_KEYS)
    }

    pub fn display_name(&self) -> String {
        self.name().unwrap_or_else(|| self.asin.clone())
    }

    pub fn review_count(&self) -> Option<u64> {
        first_number(&self.raw, REVIEW_COUNT_KEYS)
            .filter(|count| *count >= 0.0)
            .map(|count| count.round() as u64)
    }

    pub fn mean_rating(&self) -> Option<f64> {
        first_number(&self.raw, MEAN_RATING_KEYS)
    }

    pub fn disappointment_probability(&self) -> Option<f64> {
        first_number(&self.raw, DISAPPOINTMENT_KEYS)
    }

    pub fn tags(&self) -> Vec<String> {
        match self.raw.get("tags") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            asin: self.asin.clone(),
            name: self.name(),
            market: first_string(&self.raw, MARKET_KEYS),
            category: first_string(&self.raw, CATEGORY_KEYS),
            review_count: self.review_count(),
            mean_rating: self.mean_rating(),
            tags: self.tags(),
        }
    }
}

impl Serialize for ProductRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// Public projection used by the index listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub asin: String,
    pub name: Option<String>,
    pub market: Option<String>,
    pub category: Option<String>,
    pub review_count: Option<u64>,
    pub mean_rating: Option<f64>,
    pub tags: Vec<String>,
}

fn first_string(raw: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match raw.get(*key) {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

fn first_number(raw: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match raw.get(*key) {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    })
}
