//! Storage layer for the ledger. Provides storage for:
//! - Bank accounts, by number and by owner ([`AccountStore`])
//! - Append-only transaction history ([`TransactionStore`])
//! - Per-account critical sections spanning both stores ([`AccountLocks`])
//!
//! Current implementations keep everything in process memory. A durable
//! backend would implement the same traits.

mod accounts;
mod locks;
mod transactions;

pub use accounts::{AccountStore, InMemoryAccountStore};
pub use locks::AccountLocks;
pub use transactions::{InMemoryTransactionStore, TransactionStore};
