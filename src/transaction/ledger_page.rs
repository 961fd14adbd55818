//! Defines the route handlers that list the filtered transactions with their summary.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use maud::Markup;
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    AppState, Error,
    transaction::{
        Transaction,
        filter::{LedgerQuery, TransactionFilter, get_categories, get_years, query_transactions},
        summary::Summary,
        view::{LedgerView, ledger_view},
    },
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct LedgerState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LedgerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The transactions matching a filter and their totals.
#[derive(Debug, Serialize)]
pub struct Ledger {
    /// The matching transactions, newest first.
    pub transactions: Vec<Transaction>,
    /// Totals over `transactions`.
    pub summary: Summary,
}

/// Validate `query`, then get the matching transactions and their summary.
///
/// # Errors
/// Returns an [Error::InvalidFilter] if a filter cannot be parsed, or an
/// [Error::SqlError] if there is an SQL error.
fn load_ledger(query: &LedgerQuery, connection: &Connection) -> Result<Ledger, Error> {
    let filter = TransactionFilter::try_from(query)?;
    let transactions = query_transactions(&filter, connection)?;
    let summary = Summary::from_transactions(&transactions);

    Ok(Ledger {
        transactions,
        summary,
    })
}

fn parse_query(query: Result<Query<LedgerQuery>, QueryRejection>) -> Result<LedgerQuery, Error> {
    query
        .map(|Query(query)| query)
        .map_err(|rejection| Error::InvalidFilter {
            name: "query",
            value: rejection.body_text(),
        })
}

fn render_ledger_page(query: &LedgerQuery, connection: &Connection) -> Result<Markup, Error> {
    let ledger = load_ledger(query, connection)?;
    let categories = get_categories(connection)?;
    let years = get_years(connection)?;

    Ok(ledger_view(LedgerView {
        transactions: &ledger.transactions,
        summary: ledger.summary,
        selected: query,
        categories: &categories,
        years: &years,
    }))
}

/// Render the ledger page with the transactions matching the `category`,
/// `type`, `year` and `month` query parameters.
pub async fn get_ledger_page(
    State(state): State<LedgerState>,
    query: Result<Query<LedgerQuery>, QueryRejection>,
) -> Response {
    let query = match parse_query(query) {
        Ok(query) => query,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match render_ledger_page(&query, &connection) {
        Ok(page) => page.into_response(),
        Err(error) => error.into_response(),
    }
}

/// Get the transactions matching the same query parameters as the ledger page, as JSON.
pub async fn get_transactions_endpoint(
    State(state): State<LedgerState>,
    query: Result<Query<LedgerQuery>, QueryRejection>,
) -> Response {
    let query = match parse_query(query) {
        Ok(query) => query,
        Err(error) => return error.into_json_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    match load_ledger(&query, &connection) {
        Ok(ledger) => Json(ledger).into_response(),
        Err(error) => error.into_json_response(),
    }
}
