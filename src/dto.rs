//! CSV records read and written by the replay runners.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

use crate::models::BankAccount;
use crate::types::{AccountNumber, Currency, TransactionType, UserId};

/// One input row: a deposit or withdrawal against the owner's account
/// labelled `account`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRow {
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub owner: UserId,
    pub account: String,
    #[serde(deserialize_with = "deserialize_decimal_4dp")]
    pub amount: Decimal,
    pub reference: Option<String>,
}

fn deserialize_decimal_4dp<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    <Decimal as Deserialize>::deserialize(deserializer)
        .map(|dec| dec.round_dp_with_strategy(4, RoundingStrategy::ToZero))
}

/// One output row: the final state of an account touched by the replay.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AccountRow {
    pub account_number: AccountNumber,
    pub owner: UserId,
    pub name: String,
    pub balance: Decimal,
    pub currency: Currency,
    pub transactions: usize,
}

impl AccountRow {
    pub fn new(account: BankAccount, transactions: usize) -> Self {
        Self {
            balance: account.balance(),
            account_number: account.account_number,
            owner: account.owner,
            name: account.name,
            currency: account.currency,
            transactions,
        }
    }
}
