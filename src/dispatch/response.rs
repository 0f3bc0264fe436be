use serde_json::{Value, json};

use crate::error::ComparatorError;

pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

/// Transport-neutral response: a status and an optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Option<Value>,
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body: Some(body),
        }
    }

    pub fn preflight() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }

    pub fn failure(err: &ComparatorError) -> Self {
        Self {
            status: err.status(),
            body: Some(json!({
                "success": false,
                "error": format!("{:#}", err),
            })),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// CORS headers on every reply, plus the JSON content type when there is a body.
    pub fn headers(&self) -> Vec<(&'static str, &'static str)> {
        let mut headers = CORS_HEADERS.to_vec();
        if self.body.is_some() {
            headers.push(("Content-Type", "application/json"));
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preflight_carries_cors_but_no_content_type() {
        let headers = Reply::preflight().headers();
        assert_eq!(headers.len(), CORS_HEADERS.len());
        assert!(headers.contains(&("Access-Control-Allow-Origin", "*")));
    }

    #[test]
    fn failure_envelope_uses_error_status_and_full_message() {
        let err: ComparatorError = anyhow::anyhow!("root cause")
            .context("failed to read catalog file")
            .into();
        let reply = Reply::failure(&err);
        assert_eq!(reply.status, 500);
        assert!(!reply.is_success());
        let body = reply.body.unwrap();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("failed to read catalog file: root cause"));
        assert!(Reply::failure(&err).headers().contains(&("Content-Type", "application/json")));
    }
}
