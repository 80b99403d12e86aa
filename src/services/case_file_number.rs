//! Year-scoped case file numbers.
//!
//! The first number of a year is the year followed by a zero-padded
//! four-digit sequence (`20240001`). Later numbers are the previous maximum
//! plus one, computed on the whole number, so a year that passes 9999 files
//! rolls into the next year's prefix rather than widening the sequence.
//! Numbers are attributed to the year their case file was created in.

use tracing::debug;

use crate::database::manager::DatabaseError;
use crate::database::store::CaseFileStore;

/// Number given to the first case file of `year`.
pub fn first_of_year(year: i32) -> String {
    format!("{year}{:04}", 1)
}

/// Pure numbering rule: `max` is the highest number already issued for `year`.
pub fn next_number(year: i32, max: i64) -> String {
    if max > 0 {
        (max + 1).to_string()
    } else {
        first_of_year(year)
    }
}

/// Numeric value of `number` when it can take part in the sequence of
/// `year`: all ASCII digits and not below the year's first number.
///
/// Which case files belong to `year` is decided by the store from their
/// creation date, so a number that rolled past `<year>9999` still counts.
pub fn issued_for_year(number: &str, year: i32) -> Option<i64> {
    if number.is_empty() || number.len() > 18 || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: i64 = number.parse().ok()?;
    (value >= sequence_floor(year)).then_some(value)
}

/// Numeric value of [`first_of_year`]
pub fn sequence_floor(year: i32) -> i64 {
    i64::from(year) * 10_000 + 1
}

/// Derive the next case file number for `year` from what the store has issued.
///
/// Nothing is reserved: two concurrent callers can get the same value and
/// the unique index on `case_file_number` decides which insert wins.
pub async fn generate<S: CaseFileStore>(store: &S, year: i32) -> Result<String, DatabaseError> {
    let max = store.max_case_file_number_for_year(year).await?;
    let number = next_number(year, max);
    debug!("Generated case file number {} (year {}, previous max {})", number, year, max);
    Ok(number)
}
