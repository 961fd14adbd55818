//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    transaction::{
        core::create_transaction,
        payload::{TransactionPayload, parse_payload},
    },
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction from a JSON body.
///
/// Responds with 201 Created and the stored transaction as JSON.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    payload: Result<Json<TransactionPayload>, JsonRejection>,
) -> Response {
    let new_transaction = match parse_payload(payload) {
        Ok(new_transaction) => new_transaction,
        Err(error) => {
            tracing::debug!("rejected transaction: {error}");
            return error.into_json_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    match create_transaction(new_transaction, &connection) {
        Ok(transaction) => {
            tracing::debug!("created transaction {}", transaction.id);
            (StatusCode::CREATED, Json(transaction)).into_response()
        }
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            error.into_json_response()
        }
    }
}
