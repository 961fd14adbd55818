//! Defines the endpoint for deleting a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State, rejection::PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::TransactionId, transaction::core::delete_transaction,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction.
///
/// Responds with 204 No Content, or 404 if the transaction does not exist,
/// including when it has already been deleted.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
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

    match delete_transaction(transaction_id, &connection) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(Error::NotFound) => {
            tracing::debug!("tried to delete missing transaction {transaction_id}");
            Error::NotFound.into_json_response()
        }
        Err(error) => {
            tracing::error!("could not delete transaction {transaction_id}: {error}");
            error.into_json_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{FromRef, Path, State},
        http::StatusCode,
    };
    use time::macros::date;

    use crate::{
        Error,
        test_utils::get_test_state,
        transaction::{
            NewTransaction, TransactionType, create_transaction,
            delete_endpoint::{DeleteTransactionState, delete_transaction_endpoint},
            get_transaction,
        },
    };

    #[tokio::test]
    async fn deletes_transaction_then_reports_not_found() {
        let state = get_test_state();
        let transaction = create_transaction(
            NewTransaction {
                date: date!(2024 - 03 - 05),
                description: "Groceries".to_owned(),
                category: "Food".to_owned(),
                transaction_type: TransactionType::Expense,
                amount: 150.0,
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = delete_transaction_endpoint(
            State(DeleteTransactionState::from_ref(&state)),
            Ok(Path(transaction.id)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
        assert_eq!(
            get_transaction(transaction.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );

        let response = delete_transaction_endpoint(
            State(DeleteTransactionState::from_ref(&state)),
            Ok(Path(transaction.id)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
