use std::sync::Arc;

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::cli::Cli;
use crate::config::Settings;
use crate::context::AppContext;
use crate::dispatch::{self, Invocation};
use crate::lambda;
use crate::llm::LlmClient;
use crate::paths;

const LAMBDA_RUNTIME_ENV: &str = "AWS_LAMBDA_RUNTIME_API";

pub async fn run(cli: Cli) -> Result<()> {
    let in_lambda = std::env::var_os(LAMBDA_RUNTIME_ENV).is_some();
    init_tracing(in_lambda);

    let settings = settings_for(&cli);
    let llm = LlmClient::from_settings(&settings);
    let ctx = Arc::new(AppContext::new(settings, Box::new(llm)));

    if cli.mode.is_some() {
        return invoke_once(&cli, &ctx).await;
    }
    if !in_lambda {
        return Err(anyhow!(
            "{} is not set; pass --mode to run a local invocation",
            LAMBDA_RUNTIME_ENV
        ));
    }
    lambda::serve(ctx).await.map_err(|err| anyhow!(err))
}

fn settings_for(cli: &Cli) -> Settings {
    let mut settings = Settings::from_env();
    if let Some(dir) = cli.data_dir.as_deref().and_then(paths::normalize_dir) {
        settings.data_dir = Some(dir);
    }
    if cli.strict_metrics {
        settings.degrade_metrics = false;
    }
    settings
}

async fn invoke_once(cli: &Cli, ctx: &AppContext) -> Result<()> {
    let invocation = Invocation {
        request_id: Uuid::new_v4().to_string(),
        method: "GET".to_string(),
        query: cli
            .query_pairs()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect(),
        body: None,
    };
    let reply = dispatch::dispatch(ctx, &invocation).await;
    let rendered = match &reply.body {
        Some(body) => serde_json::to_string_pretty(body)?,
        None => String::new(),
    };
    println!("{rendered}");
    if !reply.is_success() {
        return Err(anyhow!("invocation failed with status {}", reply.status));
    }
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().without_time().init();
    } else {
        builder.compact().init();
    }
}
