//! Process configuration, built once at boot and never mutated afterwards.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The gateway cannot serve without at least one listener.
    #[error("no HTTP port configured (set GATEWAY_HTTP_PORT)")]
    MissingHttpPort,

    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },

    /// HTTPS was requested but the variable set is unusable. This is
    /// recoverable at the listener layer (HTTP-only fallback), not fatal.
    #[error("incomplete HTTPS configuration: {0}")]
    IncompleteHttps(&'static str),
}

/// Optional TLS listener settings. Presence of any HTTPS variable yields a
/// config; whether it is *usable* is decided by [`HttpsConfig::validate`] at
/// listener startup, matching the recoverable-fallback policy.
#[derive(Debug, Clone, Default)]
pub struct HttpsConfig {
    pub port: Option<u16>,
    pub cert_path: Option<PathBuf>,
    pub key_path: Option<PathBuf>,
}

impl HttpsConfig {
    pub fn validate(&self) -> Result<(u16, &PathBuf, &PathBuf), ConfigError> {
        let port = self.port.ok_or(ConfigError::IncompleteHttps("no port configured"))?;
        let cert = self
            .cert_path
            .as_ref()
            .ok_or(ConfigError::IncompleteHttps("no certificate path configured"))?;
        let key = self
            .key_path
            .as_ref()
            .ok_or(ConfigError::IncompleteHttps("no key path configured"))?;
        Ok((port, cert, key))
    }
}

/// Authentication scheme selection for the middleware pipeline.
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// No authentication; every request is anonymous and allowed.
    None,
    /// HS256 bearer tokens with role-based authorization.
    Jwt { secret: String },
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub http_port: u16,
    pub https: Option<HttpsConfig>,
    /// Control-plane address the embedding deployment binds a client to.
    pub spire_server_addr: Option<String>,
    /// SPIRE server configuration document exposed via the console
    /// server-info endpoint; absent means that endpoint answers 204.
    pub spire_config: Option<PathBuf>,
    pub static_root: PathBuf,
    pub index_file: String,
    pub auth: AuthConfig,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build configuration from a variable lookup. Factored out of
    /// `from_env` so tests can drive it without touching process state.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let http_port = var("GATEWAY_HTTP_PORT")
            .ok_or(ConfigError::MissingHttpPort)?
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidValue {
                var: "GATEWAY_HTTP_PORT",
                reason: e.to_string(),
            })?;

        let https_port = var("GATEWAY_HTTPS_PORT");
        let cert_path = var("GATEWAY_TLS_CERT");
        let key_path = var("GATEWAY_TLS_KEY");
        let https = if https_port.is_none() && cert_path.is_none() && key_path.is_none() {
            None
        } else {
            // Port parse failures are deferred as "no port": the listener
            // treats them as the recoverable misconfiguration class.
            Some(HttpsConfig {
                port: https_port.and_then(|p| p.parse::<u16>().ok()),
                cert_path: cert_path.map(PathBuf::from),
                key_path: key_path.map(PathBuf::from),
            })
        };

        let auth = match var("GATEWAY_AUTH_MODE").as_deref() {
            None | Some("none") => AuthConfig::None,
            Some("jwt") => AuthConfig::Jwt {
                secret: var("GATEWAY_JWT_SECRET").ok_or(ConfigError::InvalidValue {
                    var: "GATEWAY_JWT_SECRET",
                    reason: "required when GATEWAY_AUTH_MODE=jwt".into(),
                })?,
            },
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    var: "GATEWAY_AUTH_MODE",
                    reason: format!("unknown mode {other:?}"),
                });
            }
        };

        Ok(Self {
            http_port,
            https,
            spire_server_addr: var("SPIRE_SERVER_ADDR"),
            spire_config: var("GATEWAY_SPIRE_CONFIG").map(PathBuf::from),
            static_root: var("GATEWAY_STATIC_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("ui-agent")),
            index_file: var("GATEWAY_INDEX_FILE").unwrap_or_else(|| "index.html".into()),
            auth,
        })
    }
}
