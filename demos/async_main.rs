//! Replays a transactions CSV with the async runner, printing the final
//! balances to stdout.
//!
//! ```bash
//! LEDGER_WORKERS=8 cargo run --example async_main -- data/example_input.csv
//! ```

use std::env;
use std::error::Error;
use std::process;

use retail_ledger::{run_async, RunnerConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run_app().await {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

async fn run_app() -> Result<(), Box<dyn Error + Send + Sync>> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        return Err("Usage: cargo run --example async_main -- transactions.csv".into());
    }

    run_async(args[1].clone(), std::io::stdout(), &RunnerConfig::from_env()).await
}
