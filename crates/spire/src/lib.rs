//! `trustdeck-spire` — the gateway's view of the SPIRE control plane.
//!
//! The control plane is an external collaborator: this crate defines the
//! wire shapes the gateway moves (agents, registration entries, bundles,
//! federation relationships) and the opaque [`SpireClient`] seam the
//! handlers call through. Transport bindings (gRPC over the SPIRE socket)
//! live with the embedding deployment, not here.

pub mod client;
pub mod mem;
pub mod types;

pub use client::{ClientError, NullSpireClient, SpireClient};
pub use mem::InMemorySpireClient;
