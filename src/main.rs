use std::env;

use anyhow::{anyhow, Context, Result};
use retail_ledger::{run_async, RunnerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, stdout carries only the CSV output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let input = env::args()
        .nth(1)
        .context("Usage: retail-ledger <transactions.csv>")?;
    let config = RunnerConfig::from_env();

    run_async(&input, std::io::stdout(), &config)
        .await
        .map_err(|err| anyhow!(err))
        .with_context(|| format!("Failed to replay `{input}`"))
}
