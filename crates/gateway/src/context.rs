//! Long-lived, read-only-after-init context injected into every handler.
//!
//! No package-level globals: handlers see exactly this object, which makes
//! parallel test instances trivial.

use std::sync::Arc;

use serde::Serialize;

use trustdeck_spire::SpireClient;

use crate::config::GatewayConfig;
use crate::store::GatewayStore;

/// Console-side server info exposed at `/api/v1/tornjak/serverinfo`.
///
/// Present only when a SPIRE server configuration document was supplied at
/// boot; its absence is what turns that endpoint into a 204.
#[derive(Debug, Clone, Serialize)]
pub struct ConsoleServerInfo {
    pub spire_server_addr: String,
    /// Raw SPIRE server configuration document. The gateway does not parse
    /// it; the UI renders it as-is.
    pub spire_server_config: String,
}

#[derive(Clone)]
pub struct GatewayContext {
    pub spire: Arc<dyn SpireClient>,
    pub store: Arc<dyn GatewayStore>,
    pub server_info: Option<ConsoleServerInfo>,
}

impl GatewayContext {
    pub fn new(
        spire: Arc<dyn SpireClient>,
        store: Arc<dyn GatewayStore>,
        server_info: Option<ConsoleServerInfo>,
    ) -> Self {
        Self { spire, store, server_info }
    }

    /// Build the console server info from configuration, reading the SPIRE
    /// config document once at boot. A missing or unreadable document is a
    /// recoverable condition: the endpoint answers 204 instead.
    pub fn server_info_from_config(config: &GatewayConfig) -> Option<ConsoleServerInfo> {
        let path = config.spire_config.as_ref()?;
        let addr = config.spire_server_addr.clone()?;
        match std::fs::read_to_string(path) {
            Ok(doc) => Some(ConsoleServerInfo {
                spire_server_addr: addr,
                spire_server_config: doc,
            }),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed reading SPIRE config document");
                None
            }
        }
    }
}
