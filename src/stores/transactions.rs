//! Append-only transaction history.
//!
//! Maintains every recorded transaction for:
//! - Lookup by transaction id
//! - Listing an account's history in creation order
//! - Rejecting any attempt to overwrite an existing id

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::models::Transaction;
use crate::types::{AccountNumber, TransactionId};
use crate::Error;

pub trait TransactionStore: Send + Sync {
    fn get_by_id(&self, id: &TransactionId) -> Result<Transaction, Error>;

    /// Returns an owned copy of the account's transactions in the order they
    /// were stored. An account without transactions yields an empty list.
    fn get_by_account(&self, number: &AccountNumber) -> Result<Vec<Transaction>, Error>;

    /// Appends a transaction. Fails with [`Error::AlreadyExists`] if the id is
    /// already stored; the stored transaction is left unchanged.
    fn put(&self, transaction: Transaction) -> Result<(), Error>;
}

#[derive(Default)]
struct Transactions {
    by_id: HashMap<TransactionId, Transaction>,
    by_account: HashMap<AccountNumber, Vec<Transaction>>,
}

#[derive(Default)]
pub struct InMemoryTransactionStore {
    transactions: RwLock<Transactions>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.transactions.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TransactionStore for InMemoryTransactionStore {
    fn get_by_id(&self, id: &TransactionId) -> Result<Transaction, Error> {
        self.transactions
            .read()
            .by_id
            .get(id)
            .cloned()
            .ok_or_else(|| Error::TransactionNotFound(id.clone()))
    }

    fn get_by_account(&self, number: &AccountNumber) -> Result<Vec<Transaction>, Error> {
        Ok(self
            .transactions
            .read()
            .by_account
            .get(number)
            .cloned()
            .unwrap_or_default())
    }

    fn put(&self, transaction: Transaction) -> Result<(), Error> {
        let mut transactions = self.transactions.write();
        if transactions.by_id.contains_key(transaction.id()) {
            return Err(Error::AlreadyExists(format!(
                "transaction {}",
                transaction.id()
            )));
        }
        transactions
            .by_account
            .entry(transaction.account_number().clone())
            .or_default()
            .push(transaction.clone());
        transactions
            .by_id
            .insert(transaction.id().clone(), transaction);
        Ok(())
    }
}
