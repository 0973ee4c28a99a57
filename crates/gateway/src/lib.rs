//! `trustdeck-gateway` — REST/JSON gateway in front of a SPIRE control plane.
//!
//! Request path: listener → auth middleware → route table → handler →
//! codec bridge → [`SpireClient`](trustdeck_spire::SpireClient) → response
//! envelope. The gateway is stateless per request; its only durable state is
//! configuration (read-only after boot) and the gateway-owned cluster store.

pub mod app;
pub mod codec;
pub mod config;
pub mod context;
pub mod envelope;
pub mod listener;
pub mod middleware;
pub mod spa;
pub mod store;
