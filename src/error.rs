//! Domain-specific errors for the ledger.
//!
//! Every failure carries a kind that callers branch on through
//! [`Error::kind`], never through the message text:
//! - Lookup errors (account or transaction not found)
//! - Validation errors (malformed identifiers, out of range amounts)
//! - Balance rule violations (insufficient funds, too many funds)
//! - Store errors (id collision, backing store failure)

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{AccountNumber, TransactionId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("account {0} not found")]
    AccountNotFound(AccountNumber),
    #[error("transaction {0} not found")]
    TransactionNotFound(TransactionId),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("insufficient funds: balance {balance}, withdrawal {amount}")]
    InsufficientFunds { balance: Decimal, amount: Decimal },
    #[error("too many funds: balance {balance}, deposit {amount}")]
    TooManyFunds { balance: Decimal, amount: Decimal },
    #[error("{0} already exists")]
    AlreadyExists(String),
    #[error("account is owned by another user")]
    Forbidden,
    #[error("store failure: {0}")]
    StoreFailure(String),
}

/// Discriminant of an [`Error`], without its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidRequest,
    InsufficientFunds,
    TooManyFunds,
    AlreadyExists,
    Forbidden,
    StoreFailure,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::AccountNotFound(_) | Error::TransactionNotFound(_) => ErrorKind::NotFound,
            Error::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Error::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Error::TooManyFunds { .. } => ErrorKind::TooManyFunds,
            Error::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Error::Forbidden => ErrorKind::Forbidden,
            Error::StoreFailure(_) => ErrorKind::StoreFailure,
        }
    }

    /// HTTP status the presentation layer answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::NotFound => 404,
            ErrorKind::InvalidRequest => 400,
            ErrorKind::InsufficientFunds | ErrorKind::TooManyFunds => 422,
            ErrorKind::AlreadyExists => 409,
            ErrorKind::Forbidden => 403,
            ErrorKind::StoreFailure => 500,
        }
    }

    /// Wraps any error that isn't already a domain rule violation as a
    /// [`Error::StoreFailure`].
    pub(crate) fn into_store_failure(self, context: &str) -> Self {
        match self {
            Error::StoreFailure(msg) => Error::StoreFailure(format!("{context}: {msg}")),
            other => Error::StoreFailure(format!("{context}: {other}")),
        }
    }
}
