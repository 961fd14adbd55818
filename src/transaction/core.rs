//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, database_id::TransactionId};

// Serializes dates as "YYYY-MM-DD" instead of the default (year, ordinal) tuple.
time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction earned or spent money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was earned, e.g. a salary payment.
    Income,
    /// Money that was spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in JSON, query strings and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        text.parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// A free-form label used to group transactions, e.g. "Food".
    pub category: String,
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The amount of money spent or earned, always zero or greater.
    pub amount: f64,
}

/// The fields of a transaction before it has been stored and assigned an ID.
///
/// Used both for creating a transaction and for replacing all the fields of
/// an existing one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// A free-form label used to group transactions, e.g. "Food".
    pub category: String,
    /// Whether money was earned or spent.
    pub transaction_type: TransactionType,
    /// The amount of money spent or earned, always zero or greater.
    pub amount: f64,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (date, description, category, type, amount)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, date, description, category, type, amount",
        )?
        .query_row(
            (
                transaction.date,
                transaction.description,
                transaction.category,
                transaction.transaction_type,
                transaction.amount,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
#[cfg(test)]
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, date, description, category, type, amount
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Check whether there is a transaction with the ID `id`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn transaction_exists(id: TransactionId, connection: &Connection) -> Result<bool, Error> {
    let exists = connection
        .prepare("SELECT EXISTS (SELECT 1 FROM \"transaction\" WHERE id = :id)")?
        .query_row(&[(":id", &id)], |row| row.get(0))?;

    Ok(exists)
}

/// Replace every field of the transaction `id` with the fields in `transaction`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "UPDATE \"transaction\"
             SET date = ?1, description = ?2, category = ?3, type = ?4, amount = ?5
             WHERE id = ?6
             RETURNING id, date, description, category, type, amount",
        )?
        .query_row(
            (
                transaction.date,
                transaction.description,
                transaction.category,
                transaction.transaction_type,
                transaction.amount,
                id,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Delete the transaction `id` from the database.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id",
        &[(":id", &id)],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Create the transaction table in the database if it does not exist.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                amount REAL NOT NULL
                )",
        (),
    )?;

    // The ledger page sorts by date and filters by category.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        date: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        transaction_type: row.get(4)?,
        amount: row.get(5)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        transaction::core::{
            NewTransaction, TransactionType, create_transaction, delete_transaction,
            get_transaction, transaction_exists, update_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn groceries() -> NewTransaction {
        NewTransaction {
            date: date!(2024 - 03 - 05),
            description: "Groceries".to_owned(),
            category: "Food".to_owned(),
            transaction_type: TransactionType::Expense,
            amount: 150.0,
        }
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let transaction = create_transaction(groceries(), &conn).unwrap();

        assert_eq!(transaction.id, 1);
        assert_eq!(transaction.date, date!(2024 - 03 - 05));
        assert_eq!(transaction.description, "Groceries");
        assert_eq!(transaction.category, "Food");
        assert_eq!(transaction.transaction_type, TransactionType::Expense);
        assert_eq!(transaction.amount, 150.0);
    }

    #[test]
    fn create_assigns_unique_ids() {
        let conn = get_test_connection();

        let first = create_transaction(groceries(), &conn).unwrap();
        let second = create_transaction(groceries(), &conn).unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn get_returns_created_transaction() {
        let conn = get_test_connection();
        let want = create_transaction(groceries(), &conn).unwrap();

        let got = get_transaction(want.id, &conn);

        assert_eq!(got, Ok(want));
    }

    #[test]
    fn get_fails_on_missing_id() {
        let conn = get_test_connection();

        assert_eq!(get_transaction(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn update_replaces_all_fields() {
        let conn = get_test_connection();
        let original = create_transaction(groceries(), &conn).unwrap();
        let replacement = NewTransaction {
            date: date!(2024 - 04 - 20),
            description: "Refund".to_owned(),
            category: "Shopping".to_owned(),
            transaction_type: TransactionType::Income,
            amount: 42.5,
        };

        let updated = update_transaction(original.id, replacement.clone(), &conn).unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.date, replacement.date);
        assert_eq!(updated.description, replacement.description);
        assert_eq!(updated.category, replacement.category);
        assert_eq!(updated.transaction_type, replacement.transaction_type);
        assert_eq!(updated.amount, replacement.amount);
        assert_eq!(get_transaction(original.id, &conn), Ok(updated));
    }

    #[test]
    fn update_fails_on_missing_id() {
        let conn = get_test_connection();

        let result = update_transaction(42, groceries(), &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn exists_only_for_stored_transactions() {
        let conn = get_test_connection();
        let transaction = create_transaction(groceries(), &conn).unwrap();

        assert_eq!(transaction_exists(transaction.id, &conn), Ok(true));
        assert_eq!(transaction_exists(transaction.id + 1, &conn), Ok(false));
    }

    #[test]
    fn delete_removes_transaction() {
        let conn = get_test_connection();
        let transaction = create_transaction(groceries(), &conn).unwrap();

        delete_transaction(transaction.id, &conn).unwrap();

        assert_eq!(get_transaction(transaction.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn second_delete_fails_with_not_found() {
        let conn = get_test_connection();
        let transaction = create_transaction(groceries(), &conn).unwrap();
        delete_transaction(transaction.id, &conn).unwrap();

        let result = delete_transaction(transaction.id, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn schema_rejects_unknown_type() {
        let conn = get_test_connection();

        let result = conn.execute(
            "INSERT INTO \"transaction\" (date, description, category, type, amount)
             VALUES ('2024-03-01', 'Gift', 'Other', 'transfer', 10.0)",
            (),
        );

        assert!(result.is_err());
    }
}
