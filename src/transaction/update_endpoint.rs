//! Defines the endpoint for replacing the fields of an existing transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    transaction::{
        core::{transaction_exists, update_transaction},
        payload::{TransactionPayload, parse_payload},
    },
};

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that overwrites every field of a transaction with the JSON body.
///
/// Responds with the updated transaction as JSON, or 404 if there is no
/// transaction with the ID in the path. The ID is checked before the body.
pub async fn update_transaction_endpoint(
    State(state): State<UpdateTransactionState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
    payload: Result<Json<TransactionPayload>, JsonRejection>,
) -> Response {
    let Ok(Path(transaction_id)) = transaction_id else {
        return Error::NotFound.into_json_response();
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    match transaction_exists(transaction_id, &connection) {
        Ok(true) => {}
        Ok(false) => {
            tracing::debug!("tried to update missing transaction {transaction_id}");
            return Error::NotFound.into_json_response();
        }
        Err(error) => return error.into_json_response(),
    }

    let new_fields = match parse_payload(payload) {
        Ok(new_fields) => new_fields,
        Err(error) => {
            tracing::debug!("rejected update for transaction {transaction_id}: {error}");
            return error.into_json_response();
        }
    };

    match update_transaction(transaction_id, new_fields, &connection) {
        Ok(transaction) => Json(transaction).into_response(),
        Err(error) => {
            tracing::error!("could not update transaction {transaction_id}: {error}");
            error.into_json_response()
        }
    }
}
