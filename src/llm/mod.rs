mod api_error;
mod gateway;
mod gemini;

use crate::config::Settings;

pub use gateway::CompletionGateway;

/// Thin client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct LlmClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
    temperature: f32,
    http: reqwest::Client,
}

impl LlmClient {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            api_key,
            model: model.into(),
            base_url: base_url.into(),
            temperature,
            http: reqwest::Client::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.api_key.clone(),
            settings.model.clone(),
            settings.base_url.clone(),
            settings.temperature,
        )
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }
}
