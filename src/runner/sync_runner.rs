use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::{
    csv_utils::{read_csv, write_csv},
    dto::TransactionRow,
    Engine, Ledger,
};

use super::sort_rows;

/// Replays the given input file through a fresh in-memory ledger and writes
/// the final account balances to the provided writer. Rows are applied in
/// file order.
///
/// # Arguments
/// * `input_path` - Path to the input CSV file containing transactions
/// * `writer` - Where to write the account balances (e.g. stdout)
///
/// # Errors
/// Returns an error if:
/// * The input file cannot be read
/// * The CSV is malformed
/// * Writing to the output fails
///
/// Rejected transactions are logged and skipped.
pub fn run<P, W>(input_path: P, writer: W) -> Result<(), Box<dyn Error + Send + Sync>>
where
    P: AsRef<Path>,
    W: Write,
{
    let mut engine = Engine::new(Arc::new(Ledger::in_memory()));

    let file = File::open(input_path)?;
    let (mut applied, mut rejected) = (0usize, 0usize);
    for row in read_csv::<TransactionRow, _>(file) {
        // CSV parsing errors are critical - propagate them
        let row = row?;
        match engine.process_transaction(row) {
            Ok(_) => applied += 1,
            Err(_) => rejected += 1,
        }
    }
    info!(applied, rejected, "replay finished");

    let mut accounts = engine.accounts()?;
    sort_rows(&mut accounts);
    write_csv(writer, accounts)?;
    Ok(())
}
