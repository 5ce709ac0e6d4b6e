//! This example generates a CSV file of transactions for a number of owners
//! supplied as a command-line argument. Every owner gets a `current` and a
//! `savings` account.
//!
//! The CSV file can then be replayed with the `retail-ledger` binary.
//!
//! Example (100 owners):
//! ```bash
//! cargo run --example generator 100 > data/100_owners.csv
//! ```
//! ### Maths
//! Let D = NUM_DEPOSITS, W = NUM_WITHDRAWALS, A_d = DEPOSIT_AMOUNT,
//! A_w = WITHDRAWAL_AMOUNT.
//!
//! **current**: D·A_d − W·A_w = 60·50 − 20·40 = 2200, then one deposit of
//! 9000 that would exceed the 10000 limit and is rejected.
//! Final balance 2200, 80 transactions.
//!
//! **savings**: one deposit of 10000, then a withdrawal of 10000.01 that is
//! rejected as an invalid amount (above the 10000 per-transaction maximum).
//! Final balance 10000, 1 transaction.

use csv::Writer;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use retail_ledger::{TransactionRow, TransactionType, UserId};
use std::{env, error::Error};

const NUM_DEPOSITS: usize = 60;
const NUM_WITHDRAWALS: usize = 20;
const DEPOSIT_AMOUNT: Decimal = dec!(50);
const WITHDRAWAL_AMOUNT: Decimal = dec!(40);

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: cargo run --example generator <num_owners>");
        std::process::exit(1);
    }

    let num_owners: u32 = match args[1].parse() {
        Ok(n) if n > 0 => n,
        _ => {
            eprintln!("Error: <num_owners> must be a positive integer.");
            std::process::exit(1);
        }
    };

    let mut wtr = Writer::from_writer(std::io::stdout());
    let row = |owner: &UserId, account: &str, tx_type, amount| TransactionRow {
        tx_type,
        owner: owner.clone(),
        account: account.to_owned(),
        amount,
        reference: None,
    };

    // Round by round, so different owners' rows interleave.
    let owners: Vec<UserId> = (1..=num_owners)
        .map(|i| UserId::new(&format!("usr-{i}")))
        .collect::<Result<_, _>>()?;
    for round in 0..NUM_DEPOSITS + NUM_WITHDRAWALS {
        for owner in &owners {
            let (tx_type, amount) = if round < NUM_DEPOSITS {
                (TransactionType::Deposit, DEPOSIT_AMOUNT)
            } else {
                (TransactionType::Withdrawal, WITHDRAWAL_AMOUNT)
            };
            wtr.serialize(row(owner, "current", tx_type, amount))?;
        }
    }
    for owner in &owners {
        wtr.serialize(row(owner, "current", TransactionType::Deposit, dec!(9000)))?;
        wtr.serialize(row(owner, "savings", TransactionType::Deposit, dec!(10000)))?;
        wtr.serialize(row(owner, "savings", TransactionType::Withdrawal, dec!(10000.01)))?;
    }
    wtr.flush()?;
    Ok(())
}
