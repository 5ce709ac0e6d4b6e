use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::models::{BankAccount, Transaction};
use crate::stores::{AccountLocks, AccountStore, TransactionStore};
use crate::types::{AccountNumber, Currency, TransactionId, TransactionType, UserId};
use crate::Error;

/// Everything needed to move money in or out of one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTransaction {
    pub account_number: AccountNumber,
    pub owner: UserId,
    pub amount: Decimal,
    pub currency: Currency,
    pub transaction_type: TransactionType,
    pub reference: Option<String>,
}

/// The only place where balances change.
///
/// Each transaction is checked and committed inside the account's exclusive
/// section, so concurrent transactions against one account apply in a total
/// order while different accounts proceed in parallel.
pub struct TransactionService {
    transactions: Arc<dyn TransactionStore>,
    accounts: Arc<dyn AccountStore>,
    locks: Arc<AccountLocks>,
}

impl TransactionService {
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        accounts: Arc<dyn AccountStore>,
        locks: Arc<AccountLocks>,
    ) -> Self {
        Self {
            transactions,
            accounts,
            locks,
        }
    }

    /// Records a deposit or withdrawal and updates the account balance.
    ///
    /// Either both the new transaction and the new balance become visible,
    /// or neither does.
    ///
    /// # Errors
    /// * [`Error::AccountNotFound`] if the account doesn't exist
    /// * [`Error::InvalidRequest`] if the amount is outside `0..=10000` or the
    ///   currency doesn't match the account
    /// * [`Error::InsufficientFunds`] / [`Error::TooManyFunds`] if the new
    ///   balance would leave `0..=10000`
    /// * [`Error::AlreadyExists`] if the generated id is already recorded
    /// * [`Error::StoreFailure`] if a store write failed
    pub fn create_transaction(&self, request: CreateTransaction) -> Result<Transaction, Error> {
        let number = request.account_number.clone();
        let result = self.locks.exclusive(&number, || self.apply(request));
        if let Err(err) = &result {
            warn!(account_number = %number, error = %err, "transaction rejected");
        }
        result
    }

    /// Lists the account's transactions in creation order. An account
    /// without transactions gets an empty list.
    pub fn list_transactions(&self, number: &AccountNumber) -> Result<Vec<Transaction>, Error> {
        self.locks.shared(number, || {
            self.transactions
                .get_by_account(number)
                .map_err(|err| err.into_store_failure("listing transactions"))
        })
    }

    /// Fetches one transaction of the account. A transaction recorded against
    /// another account is reported as not found.
    pub fn fetch_transaction(
        &self,
        number: &AccountNumber,
        id: &TransactionId,
    ) -> Result<Transaction, Error> {
        let transaction = self.locks.shared(number, || {
            self.transactions.get_by_id(id).map_err(|err| match err {
                Error::TransactionNotFound(_) => err,
                other => other.into_store_failure("fetching transaction"),
            })
        })?;
        if transaction.account_number() != number {
            return Err(Error::TransactionNotFound(id.clone()));
        }
        Ok(transaction)
    }

    // Runs inside the account's exclusive section.
    fn apply(&self, request: CreateTransaction) -> Result<Transaction, Error> {
        let account = self
            .accounts
            .get_by_number(&request.account_number)
            .map_err(|err| match err {
                Error::AccountNotFound(_) => err,
                other => other.into_store_failure("fetching account"),
            })?;

        if request.currency != account.currency {
            return Err(Error::InvalidRequest(format!(
                "currency {} does not match account currency {}",
                request.currency, account.currency
            )));
        }
        let updated = account.apply(request.transaction_type, request.amount)?;

        let transaction = Transaction::new(
            TransactionId::random(),
            request.account_number,
            request.owner,
            request.amount,
            request.currency,
            request.transaction_type,
            request.reference,
        )?;

        self.commit(&account, updated, transaction.clone())?;
        info!(
            transaction_id = %transaction.id(),
            account_number = %transaction.account_number(),
            transaction_type = %transaction.transaction_type(),
            amount = %transaction.amount(),
            "transaction recorded"
        );
        Ok(transaction)
    }

    /// Writes the new balance, then appends the transaction. A failed append
    /// restores the previous account.
    fn commit(
        &self,
        previous: &BankAccount,
        updated: BankAccount,
        transaction: Transaction,
    ) -> Result<(), Error> {
        self.accounts
            .put(updated)
            .map_err(|err| err.into_store_failure("updating account"))?;

        let Err(err) = self.transactions.put(transaction) else {
            return Ok(());
        };

        if let Err(rollback_err) = self.accounts.put(previous.clone()) {
            error!(
                account_number = %previous.account_number,
                error = %err,
                rollback_error = %rollback_err,
                "account rollback failed"
            );
            return Err(Error::StoreFailure(format!(
                "recording transaction failed ({err}) and account rollback failed ({rollback_err})"
            )));
        }
        Err(match err {
            Error::AlreadyExists(_) => err,
            other => other.into_store_failure("recording transaction"),
        })
    }
}
