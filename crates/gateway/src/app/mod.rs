//! HTTP application wiring (router + middleware + SPA fallback).
//!
//! Layout:
//! - `routes/`: the route table and handlers (one file per API area)
//! - `dto.rs`: request/response shapes owned by the gateway itself

use axum::{Extension, Router, routing::get};

use crate::context::GatewayContext;
use crate::middleware::{self, AuthState};
use crate::spa::{self, SpaService};

pub mod dto;
pub mod routes;

/// Build the full router (public entrypoint used by `main.rs` and tests).
pub fn build_app(ctx: GatewayContext, auth: AuthState, spa: SpaService) -> Router {
    // Authenticated API group: every route passes the verification
    // middleware. OPTIONS short-circuits inside the middleware, so no route
    // needs a per-method exemption.
    let api = routes::api_router().layer(axum::middleware::from_fn_with_state(
        auth,
        middleware::verification_middleware,
    ));

    // The health group and the welcome route bypass auth entirely so
    // external liveness probes never depend on authenticator availability.
    // The SPA fallback is registered last and only sees unconsumed paths.
    Router::new()
        .route("/healthz", get(routes::system::health))
        .route("/", get(routes::system::home))
        .merge(api)
        .fallback(spa::spa_handler)
        .layer(Extension(ctx))
        .layer(Extension(spa))
}
