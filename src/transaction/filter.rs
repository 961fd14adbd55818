//! The ledger filters and the queries that apply them.
//!
//! Filters arrive as query string parameters where the sentinel value "all"
//! (or an empty value) means the dimension is not constrained.

use rusqlite::{Connection, named_params};
use serde::Deserialize;

use crate::{
    Error,
    transaction::{Transaction, TransactionType, core::map_transaction_row},
};

/// The filter value that means "do not constrain on this dimension".
pub const ALL: &str = "all";

/// The month names shown in the month selector, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn all() -> String {
    ALL.to_owned()
}

/// The raw filter selections from the query string.
///
/// These are echoed back to the ledger page so the selectors keep their state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LedgerQuery {
    /// The category to show, or "all".
    #[serde(default = "all")]
    pub category: String,
    /// "income", "expense" or "all".
    #[serde(rename = "type", default = "all")]
    pub transaction_type: String,
    /// A calendar year such as "2024", or "all".
    #[serde(default = "all")]
    pub year: String,
    /// A month number from "1" to "12", or "all".
    #[serde(default = "all")]
    pub month: String,
}

impl Default for LedgerQuery {
    fn default() -> Self {
        Self {
            category: all(),
            transaction_type: all(),
            year: all(),
            month: all(),
        }
    }
}

/// Validated filters. `None` means the dimension is not constrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Only include transactions with exactly this category.
    pub category: Option<String>,
    /// Only include income or only include expenses.
    pub transaction_type: Option<TransactionType>,
    /// Only include transactions dated in this calendar year.
    pub year: Option<i32>,
    /// Only include transactions dated in this month (1-12).
    pub month: Option<u8>,
}

/// `None` for the sentinel values, otherwise the value exactly as sent.
fn selection(value: &str) -> Option<&str> {
    if value.is_empty() || value == ALL {
        None
    } else {
        Some(value)
    }
}

impl TryFrom<&LedgerQuery> for TransactionFilter {
    type Error = Error;

    fn try_from(query: &LedgerQuery) -> Result<Self, Self::Error> {
        let transaction_type = selection(&query.transaction_type)
            .map(|value| {
                value.parse::<TransactionType>().map_err(|_| Error::InvalidFilter {
                    name: "type",
                    value: value.to_owned(),
                })
            })
            .transpose()?;

        let year = selection(&query.year)
            .map(|value| {
                value.parse::<i32>().map_err(|_| Error::InvalidFilter {
                    name: "year",
                    value: value.to_owned(),
                })
            })
            .transpose()?;

        let month = selection(&query.month)
            .map(|value| match value.parse::<u8>() {
                Ok(month) if (1..=12).contains(&month) => Ok(month),
                _ => Err(Error::InvalidFilter {
                    name: "month",
                    value: value.to_owned(),
                }),
            })
            .transpose()?;

        Ok(Self {
            category: selection(&query.category).map(str::to_owned),
            transaction_type,
            year,
            month,
        })
    }
}

/// Get the transactions matching every constraint in `filter`, newest first.
///
/// Transactions on the same date are ordered by ID, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn query_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, date, description, category, type, amount
             FROM \"transaction\"
             WHERE (:category IS NULL OR category = :category)
               AND (:type IS NULL OR type = :type)
               AND (:year IS NULL OR CAST(strftime('%Y', date) AS INTEGER) = :year)
               AND (:month IS NULL OR CAST(strftime('%m', date) AS INTEGER) = :month)
             ORDER BY date DESC, id DESC",
        )?
        .query_map(
            named_params! {
                ":category": filter.category,
                ":type": filter.transaction_type,
                ":year": filter.year,
                ":month": filter.month,
            },
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get every distinct category in alphabetical order.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_categories(connection: &Connection) -> Result<Vec<String>, Error> {
    connection
        .prepare("SELECT DISTINCT category FROM \"transaction\" ORDER BY category ASC")?
        .query_map([], |row| row.get(0))?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Get every distinct year that has at least one transaction, latest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_years(connection: &Connection) -> Result<Vec<i32>, Error> {
    connection
        .prepare(
            "SELECT DISTINCT CAST(strftime('%Y', date) AS INTEGER) AS year
             FROM \"transaction\"
             ORDER BY year DESC",
        )?
        .query_map([], |row| row.get(0))?
        .map(|maybe_year| maybe_year.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod filter_parsing_tests {
    use crate::{Error, transaction::TransactionType};

    use super::{LedgerQuery, TransactionFilter};

    fn query(category: &str, transaction_type: &str, year: &str, month: &str) -> LedgerQuery {
        LedgerQuery {
            category: category.to_owned(),
            transaction_type: transaction_type.to_owned(),
            year: year.to_owned(),
            month: month.to_owned(),
        }
    }

    #[test]
    fn all_sentinel_means_no_filter() {
        let filter = TransactionFilter::try_from(&LedgerQuery::default());

        assert_eq!(filter, Ok(TransactionFilter::default()));
    }

    #[test]
    fn empty_values_mean_no_filter() {
        let filter = TransactionFilter::try_from(&query("", "", "", ""));

        assert_eq!(filter, Ok(TransactionFilter::default()));
    }

    #[test]
    fn parses_every_filter() {
        let filter = TransactionFilter::try_from(&query("Food", "expense", "2024", "3"));

        assert_eq!(
            filter,
            Ok(TransactionFilter {
                category: Some("Food".to_owned()),
                transaction_type: Some(TransactionType::Expense),
                year: Some(2024),
                month: Some(3),
            })
        );
    }

    #[test]
    fn accepts_zero_padded_month() {
        let filter = TransactionFilter::try_from(&query("all", "all", "all", "03")).unwrap();

        assert_eq!(filter.month, Some(3));
    }

    #[test]
    fn rejects_non_numeric_year() {
        let filter = TransactionFilter::try_from(&query("all", "all", "last year", "all"));

        assert_eq!(
            filter,
            Err(Error::InvalidFilter {
                name: "year",
                value: "last year".to_owned()
            })
        );
    }

    #[test]
    fn rejects_month_out_of_range() {
        for month in ["0", "13", "March"] {
            let filter = TransactionFilter::try_from(&query("all", "all", "all", month));

            assert_eq!(
                filter,
                Err(Error::InvalidFilter {
                    name: "month",
                    value: month.to_owned()
                })
            );
        }
    }

    #[test]
    fn keeps_surrounding_whitespace_in_category() {
        let filter = TransactionFilter::try_from(&query(" Food", "all", "all", "all")).unwrap();

        assert_eq!(filter.category, Some(" Food".to_owned()));
    }

    #[test]
    fn rejects_unknown_type() {
        let filter = TransactionFilter::try_from(&query("all", "refund", "all", "all"));

        assert_eq!(
            filter,
            Err(Error::InvalidFilter {
                name: "type",
                value: "refund".to_owned()
            })
        );
    }
}
