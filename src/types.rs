//! Validated value types for identifiers and enumerations.
//!
//! Every type here is constructed through an explicit `new` (or `random`)
//! function that either returns a valid value or an [`Error::InvalidRequest`].
//! Once built, a value can't be changed.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

static ACCOUNT_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^01\d{6}$").expect("account number pattern"));
static TRANSACTION_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^tan-[A-Za-z0-9]+$").expect("transaction id pattern"));
static USER_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^usr-[A-Za-z0-9]+$").expect("user id pattern"));

/// The only sort code this institution issues.
pub const INSTITUTION_SORT_CODE: &str = "10-10-10";

/// Eight digit account number in the `01` namespace, e.g. `01234567`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AccountNumber(String);

impl AccountNumber {
    pub fn new(value: &str) -> Result<Self, Error> {
        if !ACCOUNT_NUMBER_RE.is_match(value) {
            return Err(Error::InvalidRequest(format!(
                "invalid account number {value:?}: must match format 01XXXXXX"
            )));
        }
        Ok(Self(value.to_owned()))
    }

    /// Draws a number uniformly from `01000000..=01999999`.
    /// Uniqueness is not checked here, see [`crate::AccountService::create_account`].
    pub fn random() -> Self {
        let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
        Self(format!("01{suffix:06}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SortCode(String);

impl SortCode {
    pub fn new(value: &str) -> Result<Self, Error> {
        if value != INSTITUTION_SORT_CODE {
            return Err(Error::InvalidRequest(format!(
                "invalid sort code {value:?}: must be {INSTITUTION_SORT_CODE}"
            )));
        }
        Ok(Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SortCode {
    fn default() -> Self {
        Self(INSTITUTION_SORT_CODE.to_owned())
    }
}

impl fmt::Display for SortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "GBP")]
    Gbp,
}

impl Currency {
    pub fn new(value: &str) -> Result<Self, Error> {
        match value {
            "GBP" => Ok(Self::Gbp),
            other => Err(Error::InvalidRequest(format!("invalid currency {other:?}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gbp => "GBP",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    Personal,
}

impl AccountType {
    pub fn new(value: &str) -> Result<Self, Error> {
        match value {
            "personal" => Ok(Self::Personal),
            other => Err(Error::InvalidRequest(format!(
                "invalid account type {other:?}"
            ))),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Personal => f.write_str("personal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

impl TransactionType {
    pub fn new(value: &str) -> Result<Self, Error> {
        match value {
            "deposit" => Ok(Self::Deposit),
            "withdrawal" => Ok(Self::Withdrawal),
            other => Err(Error::InvalidRequest(format!(
                "invalid transaction type {other:?}"
            ))),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => f.write_str("deposit"),
            Self::Withdrawal => f.write_str("withdrawal"),
        }
    }
}

/// Transaction identifier of the form `tan-<alphanumeric>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(value: &str) -> Result<Self, Error> {
        if !TRANSACTION_ID_RE.is_match(value) {
            return Err(Error::InvalidRequest(format!(
                "invalid transaction id {value:?}"
            )));
        }
        Ok(Self(value.to_owned()))
    }

    /// `tan-` followed by the 32 hex digits of a v4 UUID.
    pub fn random() -> Self {
        Self(format!("tan-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the customer owning accounts, of the form `usr-<alphanumeric>`.
/// Supplied by the identity layer and trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: &str) -> Result<Self, Error> {
        if !USER_ID_RE.is_match(value) {
            return Err(Error::InvalidRequest(format!("invalid user id {value:?}")));
        }
        Ok(Self(value.to_owned()))
    }

    pub fn random() -> Self {
        Self(format!("usr-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_account_number_format() {
        assert!(AccountNumber::new("01234567").is_ok());
        assert!(AccountNumber::new("01000000").is_ok());

        for bad in ["", "0123456", "012345678", "02345678", "01abcdef", " 01234567"] {
            let err = AccountNumber::new(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidRequest, "{bad:?}");
        }
    }

    #[test]
    fn test_random_account_number_is_valid() {
        for _ in 0..1000 {
            let number = AccountNumber::random();
            assert!(AccountNumber::new(number.as_str()).is_ok(), "{number}");
        }
    }

    #[test]
    fn test_sort_code_is_fixed() {
        assert_eq!(SortCode::default().as_str(), "10-10-10");
        assert_eq!(SortCode::new("10-10-10").unwrap(), SortCode::default());
        assert!(SortCode::new("20-20-20").is_err());
    }

    #[test]
    fn test_enums_parse_only_supported_values() {
        assert_eq!(Currency::new("GBP").unwrap(), Currency::Gbp);
        assert!(Currency::new("gbp").is_err());
        assert!(Currency::new("USD").is_err());

        assert_eq!(AccountType::new("personal").unwrap(), AccountType::Personal);
        assert!(AccountType::new("business").is_err());

        assert_eq!(TransactionType::new("deposit").unwrap(), TransactionType::Deposit);
        assert_eq!(
            TransactionType::new("withdrawal").unwrap(),
            TransactionType::Withdrawal
        );
        assert!(TransactionType::new("refund").is_err());
    }

    #[test]
    fn test_transaction_id() {
        let id = TransactionId::random();
        assert!(id.as_str().starts_with("tan-"));
        assert_eq!(id.as_str().len(), 4 + 32);
        assert!(TransactionId::new(id.as_str()).is_ok());
        assert_ne!(TransactionId::random(), id);

        assert!(TransactionId::new("tan-").is_err());
        assert!(TransactionId::new("tx-123").is_err());
        assert!(TransactionId::new("tan-12-34").is_err());
    }

    #[test]
    fn test_user_id() {
        assert!(UserId::new("usr-123").is_ok());
        assert!(UserId::new("user-123").is_err());
        assert!(UserId::new(UserId::random().as_str()).is_ok());
    }

    #[test]
    fn test_user_id_deserialize_validates() {
        let ok: Result<UserId, _> = parse_owner_field("usr-abc");
        assert_eq!(ok.unwrap().as_str(), "usr-abc");
        assert!(parse_owner_field("nope").is_err());
    }

    // Deserializes a single CSV field, without pulling in another format crate.
    fn parse_owner_field(raw: &str) -> Result<UserId, csv::Error> {
        let data = format!("owner\n{raw}\n");
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        #[derive(Deserialize)]
        struct Row {
            owner: UserId,
        }
        reader
            .deserialize::<Row>()
            .next()
            .expect("one row")
            .map(|row| row.owner)
    }
}
