//! Application router configuration.

use axum::{
    Router,
    routing::{get, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_ledger_page,
        get_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_ledger_page))
        .route(
            endpoints::TRANSACTIONS_API,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(update_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
