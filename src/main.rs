mod app;
mod catalog;
mod cli;
mod config;
mod context;
mod dispatch;
mod error;
mod lambda;
mod llm;
mod paths;
mod prompt;
mod reviews;

use anyhow::Result;
use clap::Parser;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    app::run(cli).await
}
