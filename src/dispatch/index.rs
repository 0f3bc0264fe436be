use serde_json::{Value, json};
use tracing::{info, warn};

use super::request::RequestParams;
use crate::context::AppContext;
use crate::error::Result;

pub(super) fn handle_index(ctx: &AppContext, params: &RequestParams) -> Result<Value> {
    let catalog = ctx.catalog()?;
    let full = params.full.unwrap_or(ctx.settings().index_full);
    if catalog.is_empty() {
        warn!("catalog has no records");
    }
    info!(records = catalog.len(), full, "listing catalog");

    let products = if full {
        serde_json::to_value(catalog.records()).map_err(anyhow::Error::from)?
    } else {
        serde_json::to_value(catalog.summaries()).map_err(anyhow::Error::from)?
    };

    Ok(json!({
        "success": true,
        "mode": "index",
        "count": catalog.len(),
        "products": products,
    }))
}
