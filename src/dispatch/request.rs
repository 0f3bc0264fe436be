use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::config::parse_flag;
use crate::error::{ComparatorError, Result};

/// Transport-neutral view of one inbound call.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub request_id: String,
    pub method: String,
    pub query: HashMap<String, String>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Index,
    Metrics,
    Narrative,
}

impl Mode {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "index" => Ok(Mode::Index),
            "metrics" => Ok(Mode::Metrics),
            "narrative" => Ok(Mode::Narrative),
            _ => Err(ComparatorError::Validation(format!(
                "invalid mode '{}': expected one of index, metrics, narrative",
                raw.trim()
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Index => "index",
            Mode::Metrics => "metrics",
            Mode::Narrative => "narrative",
        }
    }
}

/// Parameters merged from the query string and the JSON body; the query string wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams {
    pub mode: Option<String>,
    pub asin_a: Option<String>,
    pub asin_b: Option<String>,
    pub lang: Option<String>,
    pub full: Option<bool>,
}

impl RequestParams {
    pub fn from_invocation(invocation: &Invocation) -> Result<Self> {
        let body = parse_body(invocation.body.as_deref())?;
        let pick = |keys: &[&str]| -> Option<String> {
            keys.iter()
                .find_map(|key| invocation.query.get(*key).and_then(|value| non_empty(value)))
                .or_else(|| {
                    keys.iter()
                        .find_map(|key| body.get(*key).and_then(value_as_string))
                })
        };

        Ok(Self {
            mode: pick(&["mode"]),
            asin_a: pick(&["asinA", "asin_a"]),
            asin_b: pick(&["asinB", "asin_b"]),
            lang: pick(&["lang"]),
            full: pick(&["full"]).and_then(|value| parse_flag(&value)),
        })
    }

    /// Both identifiers, trimmed. Missing, blank, or identical identifiers are rejected.
    pub fn require_pair(&self, mode: Mode) -> Result<(String, String)> {
        let (Some(a), Some(b)) = (self.asin_a.as_deref(), self.asin_b.as_deref()) else {
            return Err(ComparatorError::Validation(format!(
                "asinA and asinB are required for mode '{}'",
                mode.as_str()
            )));
        };
        if a.eq_ignore_ascii_case(b) {
            return Err(ComparatorError::Validation(format!(
                "asinA and asinB must be different products (got '{}' twice)",
                a
            )));
        }
        Ok((a.to_string(), b.to_string()))
    }
}

fn parse_body(raw: Option<&str>) -> Result<Map<String, Value>> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(Map::new());
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ComparatorError::Validation(
            "request body must be a JSON object".to_string(),
        )),
        Err(err) => Err(ComparatorError::Validation(format!(
            "request body is not valid JSON: {}",
            err
        ))),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => non_empty(text),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
