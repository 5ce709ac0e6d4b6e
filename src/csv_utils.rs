//! CSV serialization and deserialization utilities.
//!
//! Provides generic functions for reading and writing CSV data.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};

/// Creates an iterator that deserializes CSV records from a reader.
/// Fields are trimmed, the first line is a header.
pub fn read_csv<T, R>(reader: R) -> impl Iterator<Item = csv::Result<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_deserialize()
}

/// Writes an iterator of records to a CSV writer.
/// Each record must implement Serialize.
pub fn write_csv<T, W>(writer: W, records: impl IntoIterator<Item = T>) -> csv::Result<()>
where
    T: Serialize,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::TransactionRow;
    use crate::types::TransactionType;
    use rust_decimal_macros::dec;
    use std::fs::File;

    #[test]
    fn test_read_csv() -> csv::Result<()> {
        let file = File::open("data/example_input.csv")?;
        let rows: Vec<TransactionRow> = read_csv(file).collect::<Result<_, _>>()?;

        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].tx_type, TransactionType::Deposit);
        assert_eq!(rows[0].owner.as_str(), "usr-alice");
        assert_eq!(rows[0].account, "current");
        assert_eq!(rows[0].amount, dec!(100.0));
        assert_eq!(rows[0].reference.as_deref(), Some("salary"));
        assert_eq!(rows[1].reference, None);
        // whitespace around fields is trimmed, extra precision is cut
        assert_eq!(rows[6].amount, dec!(1000.1234));
        Ok(())
    }

    #[test]
    fn test_read_csv_reports_bad_rows() {
        let data = "type,owner,account,amount,reference\ndeposit,usr-1,current,1,\nrefund,usr-1,current,1,\n";
        let rows: Vec<csv::Result<TransactionRow>> = read_csv(data.as_bytes()).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_ok());
        assert!(rows[1].is_err());
    }

    #[test]
    fn test_write_csv() -> csv::Result<()> {
        #[derive(Serialize)]
        struct Row {
            name: &'static str,
            balance: rust_decimal::Decimal,
        }
        let mut output = Vec::new();
        write_csv(
            &mut output,
            [
                Row {
                    name: "current",
                    balance: dec!(1.5),
                },
                Row {
                    name: "savings",
                    balance: dec!(2),
                },
            ],
        )?;
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "name,balance\ncurrent,1.5\nsavings,2\n"
        );
        Ok(())
    }
}
