//! Route table for the authenticated API group.

use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use bytes::Bytes;
use serde::de::DeserializeOwned;

use trustdeck_spire::ClientError;

use crate::codec::{self, Codec};
use crate::envelope;

pub mod console;
pub mod spire;
pub mod system;

/// The authenticated route table, in match priority order. The SPA fallback
/// is registered by the caller, after this table, so nothing here may rely
/// on registration order for correctness.
pub fn api_router() -> Router {
    Router::new()
        // Control-plane status
        .route("/api/v1/spire/serverinfo", get(spire::debug_server))
        .route("/api/v1/spire/healthcheck", get(spire::healthcheck))
        // Agents
        .route(
            "/api/v1/spire/agents",
            get(spire::agent_list).delete(spire::agent_delete),
        )
        .route("/api/v1/spire/agents/ban", post(spire::agent_ban))
        .route("/api/v1/spire/agents/jointoken", post(spire::agent_create_join_token))
        // Entries
        .route(
            "/api/v1/spire/entries",
            get(spire::entry_list)
                .post(spire::entry_create)
                .delete(spire::entry_delete),
        )
        // Bundles
        .route("/api/v1/spire/bundle", get(spire::bundle_get))
        .route(
            "/api/v1/spire/federations/bundles",
            get(spire::federated_bundle_list)
                .post(spire::federated_bundle_create)
                .patch(spire::federated_bundle_update)
                .delete(spire::federated_bundle_delete),
        )
        // Federation relationships
        .route(
            "/api/v1/spire/federations",
            get(spire::federation_list)
                .post(spire::federation_create)
                .patch(spire::federation_update)
                .delete(spire::federation_delete),
        )
        // Console-owned endpoints
        .route("/api/v1/tornjak/serverinfo", get(console::server_info))
        .route(
            "/api/v1/tornjak/selectors",
            get(console::selector_list).post(console::selector_register),
        )
        .route("/api/v1/tornjak/agents", get(console::agent_metadata_list))
        .route(
            "/api/v1/tornjak/clusters",
            get(console::cluster_list)
                .post(console::cluster_create)
                .patch(console::cluster_edit)
                .delete(console::cluster_delete),
        )
}

/// Decode a body with the route's registered codec, mapping failures to the
/// 400 decode-error response.
pub(crate) fn decode_body<T>(codec: Codec, body: &Bytes) -> Result<(usize, T), Response>
where
    T: DeserializeOwned + Default,
{
    codec::decode(codec, body)
        .map_err(|e| envelope::error_response(StatusCode::BAD_REQUEST, e.to_string()))
}

/// Map a downstream control-plane failure to the client-visible 500.
pub(crate) fn client_error(err: ClientError) -> Response {
    envelope::error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {err}"))
}

pub(crate) fn no_data_response() -> Response {
    envelope::error_response(StatusCode::BAD_REQUEST, "Error: no data provided")
}
