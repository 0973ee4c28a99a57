//! Unauthenticated routes: liveness and welcome.

use axum::response::Response;

use crate::envelope;

pub async fn health() -> Response {
    envelope::json_response(&"Endpoint is healthy.")
}

pub async fn home() -> Response {
    envelope::json_response(&"Welcome to the TrustDeck backend!")
}
