use std::sync::Arc;
use tracing::{debug, info};

use crate::models::BankAccount;
use crate::stores::{AccountLocks, AccountStore};
use crate::types::{AccountNumber, AccountType, Currency, UserId};
use crate::Error;

/// How many random account numbers are drawn before account creation gives up.
pub const MAX_ACCOUNT_NUMBER_ATTEMPTS: usize = 16;

/// Opens, lists and fetches bank accounts.
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    locks: Arc<AccountLocks>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountStore>, locks: Arc<AccountLocks>) -> Self {
        Self { accounts, locks }
    }

    /// Opens an empty GBP account under a fresh random account number.
    ///
    /// A drawn number that is already taken is discarded and another one is
    /// drawn, up to [`MAX_ACCOUNT_NUMBER_ATTEMPTS`] times.
    ///
    /// # Errors
    /// * [`Error::InvalidRequest`] if the name is blank or no free number was found
    /// * [`Error::StoreFailure`] if the account could not be stored
    pub fn create_account(
        &self,
        owner: &UserId,
        name: &str,
        account_type: AccountType,
    ) -> Result<BankAccount, Error> {
        for attempt in 1..=MAX_ACCOUNT_NUMBER_ATTEMPTS {
            let account = BankAccount::open(
                AccountNumber::random(),
                owner.clone(),
                name,
                account_type,
                Currency::Gbp,
            )?;
            match self.accounts.insert(account.clone()) {
                Ok(()) => {
                    info!(
                        account_number = %account.account_number,
                        owner = %owner,
                        "account created"
                    );
                    return Ok(account);
                }
                Err(Error::AlreadyExists(_)) => {
                    debug!(attempt, account_number = %account.account_number, "account number taken");
                }
                Err(err) => return Err(err.into_store_failure("creating account")),
            }
        }
        Err(Error::InvalidRequest(format!(
            "no free account number after {MAX_ACCOUNT_NUMBER_ATTEMPTS} attempts"
        )))
    }

    /// Lists the owner's accounts in creation order. An owner without
    /// accounts gets an empty list.
    pub fn list_accounts(&self, owner: &UserId) -> Result<Vec<BankAccount>, Error> {
        let listed = self
            .accounts
            .get_by_owner(owner)
            .map_err(|err| err.into_store_failure("listing accounts"))?;

        // Re-read each account outside of any in-flight commit.
        listed
            .into_iter()
            .filter_map(|account| match self.read(&account.account_number) {
                Ok(account) => Some(Ok(account)),
                Err(Error::AccountNotFound(_)) => None,
                Err(err) => Some(Err(err)),
            })
            .collect()
    }

    pub fn fetch_account(&self, number: &AccountNumber) -> Result<BankAccount, Error> {
        self.read(number)
    }

    /// Fetches an account on behalf of `owner`.
    ///
    /// # Errors
    /// * [`Error::AccountNotFound`] if there's no such account
    /// * [`Error::Forbidden`] if the account belongs to someone else
    pub fn fetch_owned_account(
        &self,
        owner: &UserId,
        number: &AccountNumber,
    ) -> Result<BankAccount, Error> {
        let account = self.read(number)?;
        if &account.owner != owner {
            return Err(Error::Forbidden);
        }
        Ok(account)
    }

    /// Removes an account. Deleting an unknown account is an error.
    pub fn delete_account(&self, number: &AccountNumber) -> Result<(), Error> {
        self.locks.exclusive(number, || {
            self.accounts.delete(number).map_err(|err| match err {
                Error::AccountNotFound(_) => err,
                other => other.into_store_failure("deleting account"),
            })
        })?;
        info!(account_number = %number, "account deleted");
        Ok(())
    }

    fn read(&self, number: &AccountNumber) -> Result<BankAccount, Error> {
        self.locks.shared(number, || {
            self.accounts.get_by_number(number).map_err(|err| match err {
                Error::AccountNotFound(_) => err,
                other => other.into_store_failure("fetching account"),
            })
        })
    }
}
