mod index;
mod lookup;
mod metrics;
mod narrative;
mod request;
mod response;

use tracing::{Instrument, error, info, info_span, warn};

use crate::context::AppContext;
use crate::error::{ComparatorError, Result};

use request::{Mode, RequestParams};

pub use request::Invocation;
pub use response::Reply;

/// Entry point for one invocation. Never fails: every error becomes a failure envelope.
pub async fn dispatch(ctx: &AppContext, invocation: &Invocation) -> Reply {
    let span = info_span!(
        "invocation",
        request_id = %invocation.request_id,
        method = %invocation.method
    );
    async move {
        match route(ctx, invocation).await {
            Ok(reply) => reply,
            Err(err) => {
                if err.status() >= 500 {
                    error!(kind = err.kind(), error = %err, "invocation failed");
                } else {
                    warn!(kind = err.kind(), status = err.status(), error = %err, "request rejected");
                }
                Reply::failure(&err)
            }
        }
    }
    .instrument(span)
    .await
}

async fn route(ctx: &AppContext, invocation: &Invocation) -> Result<Reply> {
    match invocation.method.to_uppercase().as_str() {
        "OPTIONS" => return Ok(Reply::preflight()),
        "GET" | "POST" => {}
        other => {
            return Err(ComparatorError::MethodNotAllowed(format!(
                "method {} not allowed (use GET, POST or OPTIONS)",
                other
            )));
        }
    }

    let params = RequestParams::from_invocation(invocation)?;
    let raw_mode = params
        .mode
        .clone()
        .unwrap_or_else(|| ctx.settings().default_mode.clone());
    let mode = Mode::parse(&raw_mode)?;
    info!(mode = mode.as_str(), "dispatching");

    let body = match mode {
        Mode::Index => index::handle_index(ctx, &params)?,
        Mode::Metrics => metrics::handle_metrics(ctx, &params).await?,
        Mode::Narrative => narrative::handle_narrative(ctx, &params).await?,
    };
    Ok(Reply::ok(body))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;
    use std::future::Future;
    use std::path::Path;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::response::CORS_HEADERS;
    use super::*;
    use crate::config::Settings;
    use crate::llm::CompletionGateway;

    enum Script {
        Reply(&'static str),
        Upstream(&'static str),
    }

    struct ScriptedGateway {
        script: Script,
        calls: Arc<AtomicUsize>,
    }

    impl CompletionGateway for ScriptedGateway {
        fn model_name(&self) -> &str {
            "scripted"
        }

        fn complete<'a>(
            &'a self,
            _prompt: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let outcome = match self.script {
                Script::Reply(text) => Ok(text.to_string()),
                Script::Upstream(message) => Err(ComparatorError::Upstream(message.to_string())),
            };
            Box::pin(async move { outcome })
        }
    }

    const CATALOG: &str = r#"[
        {"asin":"B0LAMA1","name":"Lama Lamp","market":"FR","category":"lighting","reviewCount":120,"meanRating":4.4,"ciLower":4.2,"ciUpper":4.6,"disappointmentProbability":0.08,"pros":["bright"],"cons":["pricey"],"tags":["home"]},
        {"asin":"B0LAMA2","name":"Lama Lantern","market":"FR","category":"lighting","reviewCount":45,"meanRating":3.9,"tags":["outdoor"]}
    ]"#;

    fn fixture_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("products.json"), CATALOG).unwrap();
        fs::write(dir.path().join("B0LAMA1_FR_blog.txt"), "La lampe éclaire bien.").unwrap();
        dir
    }

    fn context(dir: &Path, script: Script, degrade: bool) -> (AppContext, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let settings = Settings {
            data_dir: Some(dir.to_path_buf()),
            degrade_metrics: degrade,
            ..Settings::default()
        };
        let gateway = ScriptedGateway {
            script,
            calls: Arc::clone(&calls),
        };
        (AppContext::new(settings, Box::new(gateway)), calls)
    }

    fn get(query: &[(&str, &str)]) -> Invocation {
        Invocation {
            request_id: "test".to_string(),
            method: "GET".to_string(),
            query: query
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect::<HashMap<_, _>>(),
            body: None,
        }
    }

    fn assert_cors(reply: &Reply) {
        let headers = reply.headers();
        for expected in CORS_HEADERS {
            assert!(headers.contains(&expected), "missing {:?}", expected);
        }
    }

    #[tokio::test]
    async fn preflight_short_circuits_with_cors() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, calls) = context(&dir.path().join("missing"), Script::Reply("x"), true);
        let invocation = Invocation {
            method: "OPTIONS".to_string(),
            body: Some("{not json".to_string()),
            ..get(&[])
        };
        let reply = dispatch(&ctx, &invocation).await;
        assert_eq!(reply.status, 204);
        assert!(reply.body.is_none());
        assert_cors(&reply);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejects_other_methods() {
        let dir = fixture_dir();
        let (ctx, _) = context(dir.path(), Script::Reply("x"), true);
        let invocation = Invocation {
            method: "DELETE".to_string(),
            ..get(&[])
        };
        let reply = dispatch(&ctx, &invocation).await;
        assert_eq!(reply.status, 405);
        assert_eq!(reply.body.as_ref().unwrap()["success"], json!(false));
        assert_cors(&reply);
    }

    #[tokio::test]
    async fn index_lists_every_record_projected() {
        let dir = fixture_dir();
        let (ctx, calls) = context(dir.path(), Script::Reply("unused"), true);
        let reply = dispatch(&ctx, &get(&[("mode", "index")])).await;
        assert_eq!(reply.status, 200);
        assert_cors(&reply);
        let body = reply.body.unwrap();
        assert_eq!(body["success"], json!(true));
        assert_eq!(
            body["products"],
            json!([
                {"asin":"B0LAMA1","name":"Lama Lamp","market":"FR","category":"lighting","reviewCount":120,"meanRating":4.4,"tags":["home"]},
                {"asin":"B0LAMA2","name":"Lama Lantern","market":"FR","category":"lighting","reviewCount":45,"meanRating":3.9,"tags":["outdoor"]}
            ])
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn index_is_the_default_mode_and_can_return_full_records() {
        let dir = fixture_dir();
        let (ctx, _) = context(dir.path(), Script::Reply("unused"), true);
        let reply = dispatch(&ctx, &get(&[("full", "true")])).await;
        let body = reply.body.unwrap();
        assert_eq!(body["mode"], json!("index"));
        assert_eq!(body["products"][0]["pros"], json!(["bright"]));
        assert_eq!(body["products"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unknown_mode_names_the_valid_ones() {
        let dir = fixture_dir();
        let (ctx, _) = context(dir.path(), Script::Reply("x"), true);
        let reply = dispatch(&ctx, &get(&[("mode", "battle")])).await;
        assert_eq!(reply.status, 400);
        let error = reply.body.unwrap()["error"].as_str().unwrap().to_string();
        assert!(error.contains("index, metrics, narrative"));
    }

    #[tokio::test]
    async fn metrics_matches_lowercase_identifiers_and_returns_analysis() {
        let dir = fixture_dir();
        let (ctx, calls) = context(dir.path(), Script::Reply("Lamp wins."), true);
        let invocation = Invocation {
            method: "POST".to_string(),
            body: Some(r#"{"mode":"metrics","asinA":"b0lama1","asinB":"b0lama2"}"#.to_string()),
            ..get(&[])
        };
        let reply = dispatch(&ctx, &invocation).await;
        assert_eq!(reply.status, 200);
        let body = reply.body.unwrap();
        assert_eq!(body["analysis"], json!("Lamp wins."));
        assert_eq!(body["products"][0]["asin"], json!("B0LAMA1"));
        assert_eq!(body["products"][0]["ciLower"], json!(4.2));
        assert_eq!(body["products"][1]["asin"], json!("B0LAMA2"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn metrics_returns_records_exactly_as_published() {
        let dir = tempfile::tempdir().unwrap();
        let published = r#"{"asin":"A1","title":"Lamp","review_count":5,"pros":[],"cons":["x"]}"#;
        fs::write(
            dir.path().join("products.json"),
            format!(r#"[{},{{"asin":"A2","tags":null,"reviewCount":7.0}}]"#, published),
        )
        .unwrap();
        let (ctx, _) = context(dir.path(), Script::Reply("ok"), true);
        let reply = dispatch(
            &ctx,
            &get(&[("mode", "metrics"), ("asinA", "a1"), ("asinB", "a2")]),
        )
        .await;
        assert_eq!(reply.status, 200);
        let body = reply.body.unwrap();
        assert_eq!(serde_json::to_string(&body["products"][0]).unwrap(), published);
        assert_eq!(
            serde_json::to_string(&body["products"][1]).unwrap(),
            r#"{"asin":"A2","tags":null,"reviewCount":7.0}"#
        );
    }

    #[tokio::test]
    async fn metrics_names_missing_identifier() {
        let dir = fixture_dir();
        let (ctx, calls) = context(dir.path(), Script::Reply("x"), true);
        let reply = dispatch(
            &ctx,
            &get(&[("mode", "metrics"), ("asinA", "B0LAMA1"), ("asinB", "NOPE")]),
        )
        .await;
        assert_eq!(reply.status, 404);
        assert_cors(&reply);
        let error = reply.body.unwrap()["error"].as_str().unwrap().to_string();
        assert!(error.contains("NOPE"));
        assert!(!error.contains("B0LAMA1"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn metrics_rejects_identical_identifiers() {
        let dir = fixture_dir();
        let (ctx, _) = context(dir.path(), Script::Reply("x"), true);
        let reply = dispatch(
            &ctx,
            &get(&[("mode", "metrics"), ("asinA", "X1"), ("asinB", "x1")]),
        )
        .await;
        assert_eq!(reply.status, 400);
    }

    #[tokio::test]
    async fn metrics_degrades_to_null_analysis_on_upstream_failure() {
        let dir = fixture_dir();
        let (ctx, _) = context(dir.path(), Script::Upstream("Gemini API error (503)"), true);
        let reply = dispatch(
            &ctx,
            &get(&[("mode", "metrics"), ("asinA", "B0LAMA1"), ("asinB", "B0LAMA2")]),
        )
        .await;
        assert_eq!(reply.status, 200);
        let body = reply.body.unwrap();
        assert_eq!(body["analysis"], json!(null));
        assert_eq!(body["analysisError"], json!("Gemini API error (503)"));
        assert_eq!(body["products"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn metrics_fails_hard_when_degradation_is_off() {
        let dir = fixture_dir();
        let (ctx, _) = context(dir.path(), Script::Upstream("Gemini API error (503)"), false);
        let reply = dispatch(
            &ctx,
            &get(&[("mode", "metrics"), ("asinA", "B0LAMA1"), ("asinB", "B0LAMA2")]),
        )
        .await;
        assert_eq!(reply.status, 500);
        assert_eq!(
            reply.body.unwrap()["error"],
            json!("Gemini API error (503)")
        );
    }

    #[tokio::test]
    async fn narrative_missing_text_is_404_without_service_call() {
        let dir = fixture_dir();
        let (ctx, calls) = context(dir.path(), Script::Reply("x"), true);
        let reply = dispatch(
            &ctx,
            &get(&[("mode", "narrative"), ("asinA", "B0LAMA1"), ("asinB", "B0LAMA2")]),
        )
        .await;
        assert_eq!(reply.status, 404);
        let error = reply.body.unwrap()["error"].as_str().unwrap().to_string();
        assert!(error.contains("B0LAMA2_FR_blog.txt"));
        assert!(!error.contains("B0LAMA1_FR_blog.txt"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn narrative_returns_generated_text() {
        let dir = fixture_dir();
        fs::write(dir.path().join("B0LAMA2_EN_blog.txt"), "The lantern is sturdy.").unwrap();
        fs::write(dir.path().join("B0LAMA1_EN_blog.txt"), "The lamp is bright.").unwrap();
        let (ctx, calls) = context(dir.path(), Script::Reply("Pick the lamp."), true);
        let reply = dispatch(
            &ctx,
            &get(&[
                ("mode", "narrative"),
                ("asinA", "b0lama1"),
                ("asinB", "B0LAMA2"),
                ("lang", "en"),
            ]),
        )
        .await;
        assert_eq!(reply.status, 200);
        let body = reply.body.unwrap();
        assert_eq!(body["text"], json!("Pick the lamp."));
        assert_eq!(body["lang"], json!("EN"));
        assert_eq!(body["asinA"], json!("B0LAMA1"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn narrative_upstream_failure_is_always_hard() {
        let dir = fixture_dir();
        fs::write(dir.path().join("B0LAMA2_FR_blog.txt"), "La lanterne est solide.").unwrap();
        let (ctx, _) = context(dir.path(), Script::Upstream("Gemini returned no generated text"), true);
        let reply = dispatch(
            &ctx,
            &get(&[("mode", "narrative"), ("asinA", "B0LAMA1"), ("asinB", "B0LAMA2")]),
        )
        .await;
        assert_eq!(reply.status, 500);
        assert_cors(&reply);
    }

    #[tokio::test]
    async fn missing_data_directory_is_a_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, _) = context(&dir.path().join("gone"), Script::Reply("x"), true);
        let reply = dispatch(&ctx, &get(&[("mode", "index")])).await;
        assert_eq!(reply.status, 500);
        assert_eq!(reply.body.unwrap()["success"], json!(false));
    }

    #[tokio::test]
    async fn corrupt_catalog_is_a_server_error_with_message() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("products.json"), "{oops").unwrap();
        let (ctx, _) = context(dir.path(), Script::Reply("x"), true);
        let reply = dispatch(&ctx, &get(&[("mode", "index")])).await;
        assert_eq!(reply.status, 500);
        let error = reply.body.unwrap()["error"].as_str().unwrap().to_string();
        assert!(error.contains("catalog JSON"));
    }
}
