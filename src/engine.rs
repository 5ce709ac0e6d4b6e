use std::collections::HashMap;
use std::sync::Arc;

use crate::dto::{AccountRow, TransactionRow};
use crate::models::Transaction;
use crate::services::CreateTransaction;
use crate::types::{AccountNumber, AccountType, Currency, UserId};
use crate::{Error, Ledger};

/// Replays CSV rows against a [`Ledger`].
///
/// Rows name accounts by `(owner, label)`; the first row for a pair opens a
/// personal account called `label`, later rows reuse it. Several engines may
/// share a ledger as long as they see disjoint pairs.
pub struct Engine {
    ledger: Arc<Ledger>,
    opened: HashMap<(UserId, String), AccountNumber>,
}

impl Engine {
    pub fn new(ledger: Arc<Ledger>) -> Self {
        Self {
            ledger,
            opened: HashMap::new(),
        }
    }

    pub fn process_transaction(&mut self, row: TransactionRow) -> Result<Transaction, Error> {
        let account_number = self.account_for(&row.owner, &row.account)?;
        self.ledger
            .transactions()
            .create_transaction(CreateTransaction {
                account_number,
                owner: row.owner,
                amount: row.amount,
                currency: Currency::Gbp,
                transaction_type: row.tx_type,
                reference: row.reference,
            })
    }

    /// Current state of every account this engine opened, in no particular order.
    pub fn accounts(&self) -> Result<Vec<AccountRow>, Error> {
        self.opened
            .values()
            .map(|number| {
                let account = self.ledger.accounts().fetch_account(number)?;
                let transactions = self.ledger.transactions().list_transactions(number)?;
                Ok(AccountRow::new(account, transactions.len()))
            })
            .collect()
    }

    fn account_for(&mut self, owner: &UserId, label: &str) -> Result<AccountNumber, Error> {
        let key = (owner.clone(), label.to_owned());
        if let Some(number) = self.opened.get(&key) {
            return Ok(number.clone());
        }
        let account = self
            .ledger
            .accounts()
            .create_account(owner, label, AccountType::Personal)?;
        self.opened.insert(key, account.account_number.clone());
        Ok(account.account_number)
    }
}
