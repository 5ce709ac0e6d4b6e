//! The runner is responsible for reading transaction rows from CSV, replaying
//! them through a fresh [`crate::Ledger`], and writing the resulting account
//! balances to a writer.
//!
//! This module provides both a synchronous and an asynchronous runner
//! implementation. Both produce the same output for the same input.

mod async_runner;
mod sync_runner;

pub use async_runner::run as run_async;
pub use sync_runner::run;

use crate::dto::AccountRow;

/// Output order: by owner, then account name.
fn sort_rows(rows: &mut [AccountRow]) {
    rows.sort_by(|a, b| (&a.owner, &a.name).cmp(&(&b.owner, &b.name)));
}
