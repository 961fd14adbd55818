use axum::{body::Body, response::Response};
use rusqlite::Connection;
use serde_json::Value;

use crate::AppState;

/// Create app state backed by a new, initialized in-memory database.
pub(crate) fn get_test_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");

    AppState::new(connection).expect("Could not initialize database")
}

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    let content_type_header = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");
    assert_eq!(content_type_header, content_type);
}

pub(crate) async fn json_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    serde_json::from_slice(&body).expect("Could not parse response body as JSON")
}
