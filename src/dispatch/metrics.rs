use serde_json::{Value, json};
use tracing::{info, warn};

use super::lookup::resolve_pair;
use super::request::{Mode, RequestParams};
use crate::context::AppContext;
use crate::error::{ComparatorError, Result};
use crate::prompt;
use crate::reviews::normalize_lang;

pub(super) async fn handle_metrics(ctx: &AppContext, params: &RequestParams) -> Result<Value> {
    let (asin_a, asin_b) = params.require_pair(Mode::Metrics)?;
    let lang = normalize_lang(params.lang.as_deref().unwrap_or(&ctx.settings().default_lang))?;
    let catalog = ctx.catalog()?;
    let (a, b) = resolve_pair(&catalog, &asin_a, &asin_b)?;

    let prompt = prompt::render_metrics(a, b, &lang)?;
    let (analysis, analysis_error) = match ctx.gateway().complete(&prompt).await {
        Ok(text) => (Some(text), None),
        Err(ComparatorError::Upstream(message)) if ctx.settings().degrade_metrics => {
            warn!(error = %message, "analysis unavailable, returning metrics without it");
            (None, Some(message))
        }
        Err(err) => return Err(err),
    };
    info!(asin_a = %a.asin, asin_b = %b.asin, analysed = analysis.is_some(), "metrics comparison ready");

    let mut body = json!({
        "success": true,
        "mode": "metrics",
        "products": [a, b],
        "analysis": analysis,
    });
    if let Some(message) = analysis_error {
        body["analysisError"] = Value::String(message);
    }
    Ok(body)
}
