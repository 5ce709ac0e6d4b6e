//! In-memory retail banking ledger.
//!
//! Customers hold accounts whose balance stays within `0..=10000`, and
//! deposits or withdrawals move money in and out of them. The
//! [`AccountService`] and [`TransactionService`] enforce the balance rules and
//! keep the account and transaction stores consistent with each other under
//! concurrent use.

pub mod config;
pub mod csv_utils;
pub mod dto;
mod engine;
mod error;
mod ledger;
pub mod models;
mod runner;
pub mod services;
pub mod stores;
pub mod types;

pub use config::RunnerConfig;
pub use dto::{AccountRow, TransactionRow};
pub use engine::Engine;
pub use error::{Error, ErrorKind};
pub use ledger::Ledger;
pub use models::{BankAccount, Transaction};
pub use runner::{run, run_async};
pub use services::{AccountService, CreateTransaction, TransactionService};
pub use types::{
    AccountNumber, AccountType, Currency, SortCode, TransactionId, TransactionType, UserId,
};
