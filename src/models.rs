//! Domain records: bank accounts and the transactions applied to them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::types::{AccountNumber, AccountType, Currency, SortCode, TransactionId, TransactionType, UserId};
use crate::Error;

pub const MIN_BALANCE: Decimal = Decimal::ZERO;
pub const MAX_BALANCE: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);
pub const MIN_AMOUNT: Decimal = Decimal::ZERO;
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// A customer account. The balance stays within
/// [`MIN_BALANCE`]..=[`MAX_BALANCE`] and is only changed by
/// [`BankAccount::deposit`] and [`BankAccount::withdraw`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccount {
    pub account_number: AccountNumber,
    pub sort_code: SortCode,
    pub owner: UserId,
    pub name: String,
    pub account_type: AccountType,
    balance: Decimal,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BankAccount {
    /// Opens an empty account. Fails if the name is blank.
    pub fn open(
        account_number: AccountNumber,
        owner: UserId,
        name: &str,
        account_type: AccountType,
        currency: Currency,
    ) -> Result<Self, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidRequest("account name is required".into()));
        }
        let now = Utc::now();
        Ok(Self {
            account_number,
            sort_code: SortCode::default(),
            owner,
            name: name.to_owned(),
            account_type,
            balance: MIN_BALANCE,
            currency,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Returns the account as it would be after depositing `amount`.
    /// `self` is left untouched.
    pub fn deposit(&self, amount: Decimal) -> Result<Self, Error> {
        check_amount(amount)?;
        let balance = self.balance + amount;
        if balance > MAX_BALANCE {
            return Err(Error::TooManyFunds {
                balance: self.balance,
                amount,
            });
        }
        Ok(self.with_balance(balance))
    }

    /// Returns the account as it would be after withdrawing `amount`.
    /// `self` is left untouched.
    pub fn withdraw(&self, amount: Decimal) -> Result<Self, Error> {
        check_amount(amount)?;
        let balance = self.balance - amount;
        if balance < MIN_BALANCE {
            return Err(Error::InsufficientFunds {
                balance: self.balance,
                amount,
            });
        }
        Ok(self.with_balance(balance))
    }

    /// Applies the effect of a transaction of the given type.
    pub fn apply(&self, transaction_type: TransactionType, amount: Decimal) -> Result<Self, Error> {
        match transaction_type {
            TransactionType::Deposit => self.deposit(amount),
            TransactionType::Withdrawal => self.withdraw(amount),
        }
    }

    fn with_balance(&self, balance: Decimal) -> Self {
        Self {
            balance,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }
}

/// A deposit or withdrawal recorded against one account. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    id: TransactionId,
    account_number: AccountNumber,
    owner: UserId,
    amount: Decimal,
    currency: Currency,
    transaction_type: TransactionType,
    reference: Option<String>,
    created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        id: TransactionId,
        account_number: AccountNumber,
        owner: UserId,
        amount: Decimal,
        currency: Currency,
        transaction_type: TransactionType,
        reference: Option<String>,
    ) -> Result<Self, Error> {
        check_amount(amount)?;
        Ok(Self {
            id,
            account_number,
            owner,
            amount,
            currency,
            transaction_type,
            reference: reference.filter(|r| !r.trim().is_empty()),
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn account_number(&self) -> &AccountNumber {
        &self.account_number
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

fn check_amount(amount: Decimal) -> Result<(), Error> {
    if amount < MIN_AMOUNT || amount > MAX_AMOUNT {
        return Err(Error::InvalidRequest(format!(
            "amount {amount} must be between {MIN_AMOUNT} and {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use rust_decimal_macros::dec;

    fn account() -> BankAccount {
        BankAccount::open(
            AccountNumber::new("01000001").unwrap(),
            UserId::new("usr-123").unwrap(),
            "Mr Foo",
            AccountType::Personal,
            Currency::Gbp,
        )
        .unwrap()
    }

    #[test]
    fn test_limits() {
        assert_eq!(MAX_BALANCE, dec!(10000));
        assert_eq!(MAX_AMOUNT, dec!(10000));
    }

    #[test]
    fn test_open_account() {
        let acct = account();
        assert_eq!(acct.balance(), dec!(0));
        assert_eq!(acct.sort_code.as_str(), "10-10-10");
        assert_eq!(acct.created_at, acct.updated_at);
    }

    #[test]
    fn test_open_account_requires_name() {
        let err = BankAccount::open(
            AccountNumber::new("01000001").unwrap(),
            UserId::new("usr-123").unwrap(),
            "   ",
            AccountType::Personal,
            Currency::Gbp,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_deposit_and_withdraw_leave_original_untouched() {
        let acct = account();
        let deposited = acct.deposit(dec!(100.25)).unwrap();
        assert_eq!(acct.balance(), dec!(0));
        assert_eq!(deposited.balance(), dec!(100.25));

        let withdrawn = deposited.withdraw(dec!(0.25)).unwrap();
        assert_eq!(deposited.balance(), dec!(100.25));
        assert_eq!(withdrawn.balance(), dec!(100));
        assert_eq!(withdrawn.account_number, acct.account_number);
        assert_eq!(withdrawn.created_at, acct.created_at);
    }

    #[test]
    fn test_balance_bounds() {
        let acct = account().deposit(dec!(10000)).unwrap();
        assert_eq!(acct.balance(), MAX_BALANCE);

        let err = acct.deposit(dec!(0.0001)).unwrap_err();
        assert_eq!(
            err,
            Error::TooManyFunds {
                balance: dec!(10000),
                amount: dec!(0.0001)
            }
        );

        let empty = acct.withdraw(dec!(10000)).unwrap();
        assert_eq!(empty.balance(), MIN_BALANCE);
        let err = empty.withdraw(dec!(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
    }

    #[test]
    fn test_amount_out_of_range() {
        let acct = account();
        assert_eq!(
            acct.deposit(dec!(-1)).unwrap_err().kind(),
            ErrorKind::InvalidRequest
        );
        assert_eq!(
            acct.withdraw(dec!(10000.01)).unwrap_err().kind(),
            ErrorKind::InvalidRequest
        );
        // zero is a legal amount
        assert_eq!(acct.deposit(dec!(0)).unwrap().balance(), dec!(0));
    }

    #[test]
    fn test_apply_dispatches_on_type() {
        let acct = account();
        let acct = acct.apply(TransactionType::Deposit, dec!(50)).unwrap();
        let acct = acct.apply(TransactionType::Withdrawal, dec!(20)).unwrap();
        assert_eq!(acct.balance(), dec!(30));
    }

    #[test]
    fn test_transaction_reference_is_optional() {
        let build = |reference: Option<&str>| {
            Transaction::new(
                TransactionId::random(),
                AccountNumber::new("01000001").unwrap(),
                UserId::new("usr-123").unwrap(),
                dec!(10),
                Currency::Gbp,
                TransactionType::Deposit,
                reference.map(str::to_owned),
            )
            .unwrap()
        };
        assert_eq!(build(Some("rent")).reference(), Some("rent"));
        assert_eq!(build(Some("")).reference(), None);
        assert_eq!(build(None).reference(), None);
    }

    #[test]
    fn test_transaction_amount_bounds() {
        let err = Transaction::new(
            TransactionId::random(),
            AccountNumber::new("01000001").unwrap(),
            UserId::new("usr-123").unwrap(),
            dec!(10000.5),
            Currency::Gbp,
            TransactionType::Deposit,
            None,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }
}
