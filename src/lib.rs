//! Ledger is a web app for keeping track of personal income and expenses.
//!
//! This library provides the HTTP server: a filterable ledger page rendered
//! as HTML and a JSON API for creating, updating and deleting transactions.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod database_id;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod not_found;
mod routing;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use database_id::TransactionId;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use transaction::{NewTransaction, Transaction, TransactionType, create_transaction};

use crate::{internal_server_error::InternalServerError, not_found::get_404_not_found_response};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the ID is
    /// correct and that the transaction has not already been deleted.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The request body was not valid JSON or was missing a required key.
    #[error("invalid request body: {0}")]
    InvalidJson(String),

    /// A date string did not match the format `YYYY-MM-DD`.
    #[error("invalid date \"{0}\", expected a date formatted as YYYY-MM-DD")]
    InvalidDate(String),

    /// A transaction type other than "income" or "expense".
    #[error("invalid transaction type \"{0}\", expected \"income\" or \"expense\"")]
    InvalidTransactionType(String),

    /// An amount that is not a number from zero up to one trillion.
    #[error("invalid amount \"{0}\", expected a number from 0 to 1000000000000")]
    InvalidAmount(String),

    /// A ledger filter query parameter could not be parsed.
    #[error("invalid value \"{value}\" for the filter \"{name}\"")]
    InvalidFilter {
        /// The name of the query parameter, e.g. "month".
        name: &'static str,
        /// The raw value sent by the client.
        value: String,
    },

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code that should be sent to the client for this error.
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::InvalidJson(_)
            | Error::InvalidDate(_)
            | Error::InvalidTransactionType(_)
            | Error::InvalidAmount(_)
            | Error::InvalidFilter { .. } => StatusCode::BAD_REQUEST,
            Error::DatabaseLockError | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert the error into a JSON response of the form `{"error": "..."}`.
    ///
    /// Internal errors are replaced with a generic message, the details are
    /// only written to the server logs.
    fn into_json_response(self) -> Response {
        let status_code = self.status_code();

        let message = if status_code.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidFilter { name, value } => (
                StatusCode::BAD_REQUEST,
                html::error_view(
                    "Bad Request",
                    "400",
                    "Invalid filter",
                    &format!("\"{value}\" is not a valid value for the {name} filter."),
                ),
            )
                .into_response(),
            error if error.status_code() == StatusCode::BAD_REQUEST => (
                StatusCode::BAD_REQUEST,
                html::error_view("Bad Request", "400", "Bad request", &error.to_string()),
            )
                .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
