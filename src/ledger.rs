use std::sync::Arc;

use crate::services::{AccountService, TransactionService};
use crate::stores::{
    AccountLocks, AccountStore, InMemoryAccountStore, InMemoryTransactionStore, TransactionStore,
};

/// Both services wired to one pair of stores and one lock registry.
pub struct Ledger {
    accounts: AccountService,
    transactions: TransactionService,
}

impl Ledger {
    pub fn new(accounts: Arc<dyn AccountStore>, transactions: Arc<dyn TransactionStore>) -> Self {
        let locks = Arc::new(AccountLocks::new());
        Self {
            accounts: AccountService::new(accounts.clone(), locks.clone()),
            transactions: TransactionService::new(transactions, accounts, locks),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(InMemoryTransactionStore::new()),
        )
    }

    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    pub fn transactions(&self) -> &TransactionService {
        &self.transactions
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::in_memory()
    }
}
