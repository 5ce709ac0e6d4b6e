//! Domain services. [`AccountService`] owns account creation and lookup,
//! [`TransactionService`] is the single place where money moves.
//!
//! Both services share one [`crate::stores::AccountLocks`] registry: commits
//! take an account's exclusive section, reads its shared section.

mod accounts;
mod transactions;

pub use accounts::{AccountService, MAX_ACCOUNT_NUMBER_ATTEMPTS};
pub use transactions::{CreateTransaction, TransactionService};
