use parking_lot::RwLock;
use std::collections::HashMap;

use crate::models::BankAccount;
use crate::types::{AccountNumber, UserId};
use crate::Error;

/// Storage for bank accounts, keyed by account number with a secondary
/// index from owner to that owner's accounts.
pub trait AccountStore: Send + Sync {
    fn get_by_number(&self, number: &AccountNumber) -> Result<BankAccount, Error>;

    /// Returns an owned copy of the owner's accounts, in insertion order.
    /// An unknown owner yields an empty list.
    fn get_by_owner(&self, owner: &UserId) -> Result<Vec<BankAccount>, Error>;

    /// Stores a new account. Fails with [`Error::AlreadyExists`] if the
    /// account number is taken; the stored account is left unchanged.
    fn insert(&self, account: BankAccount) -> Result<(), Error>;

    /// Inserts or replaces an account by number.
    fn put(&self, account: BankAccount) -> Result<(), Error>;

    /// Removes an account. Fails with [`Error::AccountNotFound`] if absent.
    fn delete(&self, number: &AccountNumber) -> Result<(), Error>;
}

#[derive(Default)]
struct Accounts {
    by_number: HashMap<AccountNumber, BankAccount>,
    by_owner: HashMap<UserId, Vec<BankAccount>>,
}

impl Accounts {
    /// Writes `account` to both indices. The owner list keeps each account
    /// exactly once: an existing entry is replaced in place.
    fn upsert(&mut self, account: BankAccount) {
        let owned = self.by_owner.entry(account.owner.clone()).or_default();
        match owned
            .iter_mut()
            .find(|a| a.account_number == account.account_number)
        {
            Some(slot) => *slot = account.clone(),
            None => owned.push(account.clone()),
        }
        self.by_number.insert(account.account_number.clone(), account);
    }

    fn remove(&mut self, number: &AccountNumber) -> Option<BankAccount> {
        let removed = self.by_number.remove(number)?;
        if let Some(owned) = self.by_owner.get_mut(&removed.owner) {
            owned.retain(|a| &a.account_number != number);
            if owned.is_empty() {
                self.by_owner.remove(&removed.owner);
            }
        }
        Some(removed)
    }
}

#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<Accounts>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.read().by_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AccountStore for InMemoryAccountStore {
    fn get_by_number(&self, number: &AccountNumber) -> Result<BankAccount, Error> {
        self.accounts
            .read()
            .by_number
            .get(number)
            .cloned()
            .ok_or_else(|| Error::AccountNotFound(number.clone()))
    }

    fn get_by_owner(&self, owner: &UserId) -> Result<Vec<BankAccount>, Error> {
        Ok(self
            .accounts
            .read()
            .by_owner
            .get(owner)
            .cloned()
            .unwrap_or_default())
    }

    fn insert(&self, account: BankAccount) -> Result<(), Error> {
        let mut accounts = self.accounts.write();
        if accounts.by_number.contains_key(&account.account_number) {
            return Err(Error::AlreadyExists(format!(
                "account {}",
                account.account_number
            )));
        }
        accounts.upsert(account);
        Ok(())
    }

    fn put(&self, account: BankAccount) -> Result<(), Error> {
        self.accounts.write().upsert(account);
        Ok(())
    }

    fn delete(&self, number: &AccountNumber) -> Result<(), Error> {
        self.accounts
            .write()
            .remove(number)
            .map(|_| ())
            .ok_or_else(|| Error::AccountNotFound(number.clone()))
    }
}
