//! Headless Snake: line-delimited JSON over stdin/stdout.
//!
//! Logs go to stderr (`SNAKE_LOG`, default `info`) so stdout carries only
//! protocol messages.

use anyhow::Result;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use tui_snake::adapter::run_session;
use tui_snake::core::RunConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_env("SNAKE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = RunConfig::from_env();
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    run_session(config, stdin, stdout).await?;
    Ok(())
}
