//! Handlers for the console-owned endpoints: server info, selector
//! registrations, agent metadata, and cluster CRUD. These hit the gateway's
//! own store rather than the SPIRE control plane.

use axum::Extension;
use axum::http::StatusCode;
use axum::response::Response;
use bytes::Bytes;

use crate::app::dto::{
    DeleteClusterRequest, EditClusterRequest, ListAgentMetadataRequest, ListAgentMetadataResponse,
    ListClustersResponse, ListSelectorsResponse, RegisterClusterRequest, RegisterSelectorRequest,
};
use crate::app::routes::{decode_body, no_data_response};
use crate::codec::Codec;
use crate::context::GatewayContext;
use crate::envelope;
use crate::store::{Cluster, StoreError};

/// Console server info. Answers a bare 204 when no SPIRE server
/// configuration was supplied at boot, so the UI can distinguish
/// "unconfigured" from an error.
pub async fn server_info(Extension(ctx): Extension<GatewayContext>) -> Response {
    match &ctx.server_info {
        Some(info) => envelope::json_response(info),
        None => envelope::no_content(),
    }
}

pub async fn selector_register(
    Extension(ctx): Extension<GatewayContext>,
    body: Bytes,
) -> Response {
    let (n, input) = match decode_body::<RegisterSelectorRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if n == 0 {
        return no_data_response();
    }
    match ctx.store.register_selector(input.agent) {
        Ok(()) => envelope::success_response(),
        Err(err) => store_error(err),
    }
}

pub async fn selector_list(Extension(ctx): Extension<GatewayContext>) -> Response {
    match ctx.store.list_selectors() {
        Ok(agents) => envelope::json_response(&ListSelectorsResponse { agents }),
        Err(err) => store_error(err),
    }
}

pub async fn agent_metadata_list(
    Extension(ctx): Extension<GatewayContext>,
    body: Bytes,
) -> Response {
    let (_, input) = match decode_body::<ListAgentMetadataRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match ctx.store.list_agent_metadata(&input.agents) {
        Ok(agents) => envelope::json_response(&ListAgentMetadataResponse { agents }),
        Err(err) => store_error(err),
    }
}

pub async fn cluster_list(Extension(ctx): Extension<GatewayContext>) -> Response {
    match ctx.store.list_clusters() {
        Ok(clusters) => envelope::json_response(&ListClustersResponse { clusters }),
        Err(err) => store_error(err),
    }
}

pub async fn cluster_create(Extension(ctx): Extension<GatewayContext>, body: Bytes) -> Response {
    let (n, input) = match decode_body::<RegisterClusterRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if n == 0 {
        return no_data_response();
    }
    match ctx.store.create_cluster(input.cluster) {
        Ok(()) => envelope::success_response(),
        Err(err) => store_error(err),
    }
}

pub async fn cluster_edit(Extension(ctx): Extension<GatewayContext>, body: Bytes) -> Response {
    let (n, input) = match decode_body::<EditClusterRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if n == 0 {
        return no_data_response();
    }
    let edit = input.cluster;
    // An empty edited_name means "keep the current name".
    let new_name = if edit.edited_name.is_empty() {
        edit.name.clone()
    } else {
        edit.edited_name
    };
    let replacement = Cluster {
        name: new_name,
        platform_type: edit.platform_type,
        domain_name: edit.domain_name,
        managed_by: edit.managed_by,
        agents_list: edit.agents_list,
    };
    match ctx.store.edit_cluster(&edit.name, replacement) {
        Ok(()) => envelope::success_response(),
        Err(err) => store_error(err),
    }
}

pub async fn cluster_delete(Extension(ctx): Extension<GatewayContext>, body: Bytes) -> Response {
    let (n, input) = match decode_body::<DeleteClusterRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if n == 0 {
        return no_data_response();
    }
    match ctx.store.delete_cluster(&input.cluster.name) {
        Ok(()) => envelope::success_response(),
        Err(err) => store_error(err),
    }
}

/// Store failures are caller mistakes (duplicate name, unknown cluster), not
/// gateway faults, so they surface as 400s.
fn store_error(err: StoreError) -> Response {
    envelope::error_response(StatusCode::BAD_REQUEST, format!("Error: {err}"))
}
