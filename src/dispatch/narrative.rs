use serde_json::{Value, json};
use tracing::info;

use super::lookup::resolve_pair;
use super::request::{Mode, RequestParams};
use crate::context::AppContext;
use crate::error::{ComparatorError, Result};
use crate::prompt::{self, NarrativeInput};
use crate::reviews::{blog_file_name, load_review_text, normalize_lang};

pub(super) async fn handle_narrative(ctx: &AppContext, params: &RequestParams) -> Result<Value> {
    let (asin_a, asin_b) = params.require_pair(Mode::Narrative)?;
    let lang = normalize_lang(params.lang.as_deref().unwrap_or(&ctx.settings().default_lang))?;
    let catalog = ctx.catalog()?;
    let (a, b) = resolve_pair(&catalog, &asin_a, &asin_b)?;

    let data_dir = ctx.data_dir()?;
    let review_a = load_review_text(data_dir, &a.asin, &lang)?;
    let review_b = load_review_text(data_dir, &b.asin, &lang)?;
    let (Some(review_a), Some(review_b)) = (review_a.as_deref(), review_b.as_deref()) else {
        let missing = [(a, review_a.is_none()), (b, review_b.is_none())]
            .into_iter()
            .filter(|(_, absent)| *absent)
            .map(|(record, _)| {
                format!("{} (expected {})", record.asin, blog_file_name(&record.asin, &lang))
            })
            .collect::<Vec<_>>();
        return Err(ComparatorError::NotFound(format!(
            "review text not found: {}",
            missing.join(", ")
        )));
    };

    let prompt = prompt::render_narrative(&NarrativeInput {
        product_a: a,
        product_b: b,
        review_a,
        review_b,
        lang: &lang,
    })?;
    let text = ctx.gateway().complete(&prompt).await?;
    info!(asin_a = %a.asin, asin_b = %b.asin, lang = %lang, chars = text.len(), "narrative ready");

    Ok(json!({
        "success": true,
        "mode": "narrative",
        "lang": lang,
        "asinA": a.asin,
        "asinB": b.asin,
        "text": text,
    }))
}
