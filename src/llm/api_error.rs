use serde::Deserialize;

const MAX_RAW_ERROR_CHARS: usize = 300;

pub(crate) fn extract_api_error(body: &str) -> String {
    #[derive(Debug, Deserialize)]
    struct GeminiErrorEnvelope {
        error: Option<GeminiError>,
    }
    #[derive(Debug, Deserialize)]
    struct GeminiError {
        message: Option<String>,
        status: Option<String>,
        code: Option<i64>,
    }

    if let Ok(parsed) = serde_json::from_str::<GeminiErrorEnvelope>(body)
        && let Some(err) = parsed.error
    {
        let message = err.message.unwrap_or_else(|| "unknown error".to_string());
        let status = err.status.unwrap_or_else(|| "unknown".to_string());
        let code = err
            .code
            .map(|value| value.to_string())
            .unwrap_or_else(|| "none".to_string());
        return format!("{} (status={}, code={})", message, status, code);
    }
    let trimmed = body.trim();
    if trimmed.chars().count() > MAX_RAW_ERROR_CHARS {
        let head = trimmed.chars().take(MAX_RAW_ERROR_CHARS).collect::<String>();
        return format!("{}…", head);
    }
    trimmed.to_string()
}
