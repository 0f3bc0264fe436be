use anyhow::{Context, Result};
use tera::{Context as TeraContext, Tera};

use crate::catalog::ProductRecord;

const METRICS_PROMPT_TEMPLATE: &str = include_str!("prompts/metrics_prompt.tera");
const NARRATIVE_PROMPT_TEMPLATE: &str = include_str!("prompts/narrative_prompt.tera");

pub struct NarrativeInput<'a> {
    pub product_a: &'a ProductRecord,
    pub product_b: &'a ProductRecord,
    pub review_a: &'a str,
    pub review_b: &'a str,
    pub lang: &'a str,
}

pub fn render_metrics(a: &ProductRecord, b: &ProductRecord, lang: &str) -> Result<String> {
    let mut context = TeraContext::new();
    context.insert("name_a", &a.display_name());
    context.insert("name_b", &b.display_name());
    context.insert("product_a", &serde_json::to_string_pretty(a)?);
    context.insert("product_b", &serde_json::to_string_pretty(b)?);
    context.insert("lang", lang);

    Tera::one_off(METRICS_PROMPT_TEMPLATE, &context, false)
        .with_context(|| "failed to render metrics prompt")
}

pub fn render_narrative(input: &NarrativeInput<'_>) -> Result<String> {
    let mut context = TeraContext::new();
    context.insert("name_a", &input.product_a.display_name());
    context.insert("name_b", &input.product_b.display_name());
    context.insert("asin_a", &input.product_a.asin);
    context.insert("asin_b", &input.product_b.asin);
    context.insert("review_a", input.review_a.trim());
    context.insert("review_b", input.review_b.trim());
    context.insert("product_a", &key_figures(input.product_a));
    context.insert("product_b", &key_figures(input.product_b));
    context.insert("lang", input.lang);

    Tera::one_off(NARRATIVE_PROMPT_TEMPLATE, &context, false)
        .with_context(|| "failed to render narrative prompt")
}

fn key_figures(record: &ProductRecord) -> String {
    let mut parts = Vec::new();
    if let Some(rating) = record.mean_rating() {
        parts.push(format!("mean rating {:.2}", rating));
    }
    if let Some(count) = record.review_count() {
        parts.push(format!("{} reviews", count));
    }
    if let Some(probability) = record.disappointment_probability() {
        parts.push(format!("disappointment probability {:.0}%", probability * 100.0));
    }
    parts.join(", ")
}
