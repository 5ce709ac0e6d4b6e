use std::collections::hash_map::DefaultHasher;
use std::error::Error;
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::{
    config::RunnerConfig,
    csv_utils::write_csv,
    dto::{AccountRow, TransactionRow},
    Engine, Ledger,
};

use csv_async::{AsyncReaderBuilder, Error as CsvError, Trim};
use tokio::fs::File;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_stream::StreamExt;
use tracing::{debug, info};

use super::sort_rows;

type Result<T, E = Box<dyn Error + Send + Sync>> = std::result::Result<T, E>;

/// Replays the given input file through a fresh in-memory ledger and writes
/// the final account balances to the provided writer.
/// Spawns:
/// * CSV reader - streams rows from the input file, deserializes them and
///   routes each one to a worker by `(owner, account)`.
/// * `config.workers` workers - each applies its rows in arrival order until
///   its channel is closed.
///
/// Rows for one account always reach the same worker, so per-account order is
/// the file order; different accounts are applied in parallel.
///
/// # Arguments
/// * `input_path` - Path to the input CSV file containing transactions
/// * `writer` - Where to write the account balances (e.g. stdout)
/// * `config` - Worker count and channel capacity
///
/// # Errors
/// Returns an error if:
/// * The input file cannot be read
/// * The CSV is malformed
/// * Writing to the output fails
pub async fn run<P, W>(input_path: P, writer: W, config: &RunnerConfig) -> Result<()>
where
    P: AsRef<Path>,
    W: Write,
{
    let ledger = Arc::new(Ledger::in_memory());
    let workers = config.workers.max(1);

    let mut senders = Vec::with_capacity(workers);
    let mut handles = JoinSet::new();
    for worker in 0..workers {
        let (tx, rx) = mpsc::channel(config.buffer_size.max(1));
        senders.push(tx);
        handles.spawn(process_transactions(worker, ledger.clone(), rx));
    }

    let input_path = input_path.as_ref().to_owned();
    let reader_handle = tokio::spawn(read_transactions(input_path, senders));

    // Wait for reader to finish and propagate any errors
    reader_handle.await??;

    let mut accounts = Vec::new();
    while let Some(rows) = handles.join_next().await {
        accounts.extend(rows??);
    }
    sort_rows(&mut accounts);

    // Write account balances to the provided writer
    write_csv(writer, accounts)?;
    Ok(())
}

/// Reads and deserializes rows from a CSV file and routes them to workers.
/// Dropping the senders on return closes every worker's channel.
async fn read_transactions(
    input_path: impl AsRef<Path> + Send,
    senders: Vec<mpsc::Sender<TransactionRow>>,
) -> Result<(), CsvError> {
    let file = File::open(input_path).await?;
    let mut csv_reader = AsyncReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .create_deserializer(file);

    let mut records = csv_reader.deserialize::<TransactionRow>();
    while let Some(result) = records.next().await {
        // CSV parsing errors are critical - propagate them
        let row = result?;
        let worker = shard(&row, senders.len());
        if senders[worker].send(row).await.is_err() {
            // Worker gone, exit gracefully
            break;
        }
    }
    Ok(())
}

/// Applies rows received through the channel.
/// Returns the accounts this worker opened once the channel is closed.
///
/// Applying a row blocks on the ledger's `parking_lot` locks. No lock is held
/// across an `.await` and sections only cover in-memory map updates, so the
/// wait is short and the tasks stay on the async executor.
async fn process_transactions(
    worker: usize,
    ledger: Arc<Ledger>,
    mut rx: mpsc::Receiver<TransactionRow>,
) -> Result<Vec<AccountRow>> {
    let mut engine = Engine::new(ledger);
    let (mut applied, mut rejected) = (0usize, 0usize);
    while let Some(row) = rx.recv().await {
        // Rejected transactions are logged by the service and skipped
        match engine.process_transaction(row) {
            Ok(_) => applied += 1,
            Err(_) => rejected += 1,
        }
    }
    debug!(worker, applied, rejected, "worker finished");
    let accounts = engine.accounts()?;
    info!(worker, accounts = accounts.len(), "worker drained");
    Ok(accounts)
}

fn shard(row: &TransactionRow, workers: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    (&row.owner, &row.account).hash(&mut hasher);
    (hasher.finish() % workers as u64) as usize
}
