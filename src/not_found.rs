//! Defines the page to display when a route or resource does not exist.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::html::error_view;

pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        error_view(
            "Not Found",
            "404",
            "Something's missing.",
            "Sorry, we can't find that page. You'll find lots to explore on the ledger page.",
        ),
    )
        .into_response()
}
