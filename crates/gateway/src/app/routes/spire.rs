//! Proxy handlers for the SPIRE control-plane API.
//!
//! Every handler follows the same shape: decode with the route's codec,
//! call through the opaque client, encode the result. The gateway validates
//! shape only; semantic validation is the control plane's job.

use axum::Extension;
use axum::response::Response;
use bytes::Bytes;

use trustdeck_spire::types::*;

use crate::app::routes::{client_error, decode_body, no_data_response};
use crate::codec::Codec;
use crate::context::GatewayContext;
use crate::envelope;

pub async fn debug_server(Extension(ctx): Extension<GatewayContext>) -> Response {
    match ctx.spire.debug_server().await {
        Ok(ret) => envelope::json_response(&ret),
        Err(err) => client_error(err),
    }
}

pub async fn healthcheck(Extension(ctx): Extension<GatewayContext>, body: Bytes) -> Response {
    let (_, input) = match decode_body::<HealthcheckRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match ctx.spire.healthcheck(input).await {
        Ok(ret) => envelope::json_response(&ret),
        Err(err) => client_error(err),
    }
}

pub async fn agent_list(Extension(ctx): Extension<GatewayContext>, body: Bytes) -> Response {
    let (_, input) = match decode_body::<ListAgentsRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match ctx.spire.list_agents(input).await {
        Ok(ret) => envelope::json_response(&ret),
        Err(err) => client_error(err),
    }
}

pub async fn agent_ban(Extension(ctx): Extension<GatewayContext>, body: Bytes) -> Response {
    let (n, input) = match decode_body::<BanAgentRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    // Banning "the default agent" is never meant; an ID is required.
    if n == 0 {
        return no_data_response();
    }
    match ctx.spire.ban_agent(input).await {
        Ok(()) => envelope::success_response(),
        Err(err) => client_error(err),
    }
}

pub async fn agent_delete(Extension(ctx): Extension<GatewayContext>, body: Bytes) -> Response {
    let (n, input) = match decode_body::<DeleteAgentRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if n == 0 {
        return no_data_response();
    }
    match ctx.spire.delete_agent(input).await {
        Ok(()) => envelope::success_response(),
        Err(err) => client_error(err),
    }
}

pub async fn agent_create_join_token(
    Extension(ctx): Extension<GatewayContext>,
    body: Bytes,
) -> Response {
    let (_, input) = match decode_body::<CreateJoinTokenRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match ctx.spire.create_join_token(input).await {
        Ok(ret) => envelope::json_response(&ret),
        Err(err) => client_error(err),
    }
}

pub async fn entry_list(Extension(ctx): Extension<GatewayContext>, body: Bytes) -> Response {
    let (_, input) = match decode_body::<ListEntriesRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match ctx.spire.list_entries(input).await {
        Ok(ret) => envelope::json_response(&ret),
        Err(err) => client_error(err),
    }
}

pub async fn entry_create(Extension(ctx): Extension<GatewayContext>, body: Bytes) -> Response {
    let (_, input) = match decode_body::<BatchCreateEntryRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match ctx.spire.batch_create_entries(input).await {
        Ok(ret) => envelope::json_response(&ret),
        Err(err) => client_error(err),
    }
}

pub async fn entry_delete(Extension(ctx): Extension<GatewayContext>, body: Bytes) -> Response {
    let (_, input) = match decode_body::<BatchDeleteEntryRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match ctx.spire.batch_delete_entries(input).await {
        Ok(ret) => envelope::json_response(&ret),
        Err(err) => client_error(err),
    }
}

pub async fn bundle_get(Extension(ctx): Extension<GatewayContext>, body: Bytes) -> Response {
    let (_, input) = match decode_body::<GetBundleRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match ctx.spire.get_bundle(input).await {
        Ok(ret) => envelope::json_response(&ret),
        Err(err) => client_error(err),
    }
}

pub async fn federated_bundle_list(
    Extension(ctx): Extension<GatewayContext>,
    body: Bytes,
) -> Response {
    let (_, input) = match decode_body::<ListFederatedBundlesRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match ctx.spire.list_federated_bundles(input).await {
        Ok(ret) => envelope::json_response(&ret),
        Err(err) => client_error(err),
    }
}

pub async fn federated_bundle_create(
    Extension(ctx): Extension<GatewayContext>,
    body: Bytes,
) -> Response {
    let (_, input) = match decode_body::<CreateFederatedBundleRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match ctx.spire.create_federated_bundle(input).await {
        Ok(ret) => envelope::json_response(&ret),
        Err(err) => client_error(err),
    }
}

pub async fn federated_bundle_update(
    Extension(ctx): Extension<GatewayContext>,
    body: Bytes,
) -> Response {
    let (_, input) = match decode_body::<UpdateFederatedBundleRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match ctx.spire.update_federated_bundle(input).await {
        Ok(ret) => envelope::json_response(&ret),
        Err(err) => client_error(err),
    }
}

pub async fn federated_bundle_delete(
    Extension(ctx): Extension<GatewayContext>,
    body: Bytes,
) -> Response {
    let (_, input) = match decode_body::<DeleteFederatedBundleRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match ctx.spire.delete_federated_bundle(input).await {
        Ok(ret) => envelope::json_response(&ret),
        Err(err) => client_error(err),
    }
}

pub async fn federation_list(Extension(ctx): Extension<GatewayContext>, body: Bytes) -> Response {
    let (_, input) = match decode_body::<ListFederationRelationshipsRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match ctx.spire.list_federation_relationships(input).await {
        Ok(ret) => envelope::json_response(&ret),
        Err(err) => client_error(err),
    }
}

// The federation batch mutations are the two routes whose request shapes
// are the control plane's protobuf types, hence the ProtoJson codec.

pub async fn federation_create(Extension(ctx): Extension<GatewayContext>, body: Bytes) -> Response {
    let (_, input) =
        match decode_body::<BatchCreateFederationRelationshipRequest>(Codec::ProtoJson, &body) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
    match ctx.spire.create_federation_relationships(input).await {
        Ok(ret) => envelope::json_response(&ret),
        Err(err) => client_error(err),
    }
}

pub async fn federation_update(Extension(ctx): Extension<GatewayContext>, body: Bytes) -> Response {
    let (_, input) =
        match decode_body::<BatchUpdateFederationRelationshipRequest>(Codec::ProtoJson, &body) {
            Ok(v) => v,
            Err(resp) => return resp,
        };
    match ctx.spire.update_federation_relationships(input).await {
        Ok(ret) => envelope::json_response(&ret),
        Err(err) => client_error(err),
    }
}

pub async fn federation_delete(Extension(ctx): Extension<GatewayContext>, body: Bytes) -> Response {
    let (_, input) = match decode_body::<DeleteFederationRelationshipRequest>(Codec::Json, &body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match ctx.spire.delete_federation_relationships(input).await {
        Ok(ret) => envelope::json_response(&ret),
        Err(err) => client_error(err),
    }
}
