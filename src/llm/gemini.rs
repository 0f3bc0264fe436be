use anyhow::Context;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::LlmClient;
use super::api_error::extract_api_error;
use crate::error::{ComparatorError, Result};

impl LlmClient {
    pub(crate) async fn generate_text(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ComparatorError::Config(
                "API key not configured (set GEMINI_API_KEY or GOOGLE_API_KEY)".to_string(),
            )
        })?;

        let model_path = if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        };
        let endpoint = format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model_path
        );
        let mut url = reqwest::Url::parse(&endpoint)
            .with_context(|| "failed to parse Gemini endpoint URL")?;
        url.query_pairs_mut().append_pair("key", api_key);

        let body = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [
                        {"text": prompt}
                    ]
                }
            ],
            "generationConfig": {
                "temperature": self.temperature
            }
        });

        debug!(model = %self.model, prompt_chars = prompt.len(), "calling Gemini");
        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|err| ComparatorError::Upstream(format!("Gemini request failed: {}", err)))?;
        let status = response.status();
        let payload = read_payload(status.is_success(), response.text().await)?;
        if !status.is_success() {
            let detail = extract_api_error(&payload);
            warn!(%status, detail = %detail, "Gemini returned an error status");
            return Err(ComparatorError::Upstream(format!(
                "Gemini API error ({}): {}",
                status, detail
            )));
        }

        extract_generated_text(&payload)
    }
}

/// A body that cannot be read is an upstream failure when the status claimed
/// success; error statuses fall back to an empty detail.
fn read_payload<E: std::fmt::Display>(
    success: bool,
    body: std::result::Result<String, E>,
) -> Result<String> {
    match body {
        Ok(payload) => Ok(payload),
        Err(err) if success => Err(ComparatorError::Upstream(format!(
            "failed to read Gemini response: {}",
            err
        ))),
        Err(_) => Ok(String::new()),
    }
}

pub(super) fn extract_generated_text(payload: &str) -> Result<String> {
    let parsed: GeminiResponse = serde_json::from_str(payload)
        .map_err(|err| ComparatorError::Upstream(format!("failed to parse Gemini response JSON: {}", err)))?;

    let text = parsed
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ComparatorError::Upstream(
            "Gemini returned no generated text".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}
