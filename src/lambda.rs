use std::collections::HashMap;
use std::sync::Arc;

use lambda_http::{Body, Error, Request, RequestExt, Response, run, service_fn};
use tracing::info;
use uuid::Uuid;

use crate::context::AppContext;
use crate::dispatch::{self, Invocation, Reply};

/// Runs the Lambda event loop until the runtime shuts the process down.
pub async fn serve(ctx: Arc<AppContext>) -> Result<(), Error> {
    info!(
        model = ctx.gateway().model_name(),
        "lama-comparator lambda starting"
    );
    run(service_fn(move |event: Request| {
        let ctx = Arc::clone(&ctx);
        async move { handle_event(&ctx, event).await }
    }))
    .await
}

pub async fn handle_event(ctx: &AppContext, event: Request) -> Result<Response<Body>, Error> {
    let invocation = to_invocation(&event);
    let reply = dispatch::dispatch(ctx, &invocation).await;
    to_response(reply)
}

fn to_invocation(event: &Request) -> Invocation {
    let request_id = event
        .lambda_context_ref()
        .map(|context| context.request_id.clone())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    // first value wins for repeated keys, matching QueryMap::first
    let mut query = HashMap::new();
    if let Some(params) = event.query_string_parameters_ref() {
        for (key, value) in params.iter() {
            query
                .entry(key.to_string())
                .or_insert_with(|| value.to_string());
        }
    }
    let raw: &[u8] = event.body();
    let body = if raw.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(raw).into_owned())
    };

    Invocation {
        request_id,
        method: event.method().as_str().to_string(),
        query,
        body,
    }
}

fn to_response(reply: Reply) -> Result<Response<Body>, Error> {
    let mut builder = Response::builder().status(reply.status);
    for (name, value) in reply.headers() {
        builder = builder.header(name, value);
    }
    let body = match reply.body {
        Some(value) => Body::from(value.to_string()),
        None => Body::Empty,
    };
    let response = builder.body(body).map_err(Box::new)?;
    Ok(response)
}
