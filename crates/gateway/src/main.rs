use std::sync::Arc;

use trustdeck_auth::{
    AllowAllAuthorizer, JwtAuthenticator, NullAuthenticator, RoleAuthorizer,
};
use trustdeck_gateway::app;
use trustdeck_gateway::config::{AuthConfig, GatewayConfig};
use trustdeck_gateway::context::GatewayContext;
use trustdeck_gateway::listener;
use trustdeck_gateway::middleware::AuthState;
use trustdeck_gateway::spa::SpaService;
use trustdeck_gateway::store::MemoryGatewayStore;
use trustdeck_spire::NullSpireClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    trustdeck_observability::init();

    let config = GatewayConfig::from_env()?;

    let auth = match &config.auth {
        AuthConfig::None => {
            tracing::warn!("authentication is disabled; all API requests are anonymous");
            AuthState {
                authenticator: Arc::new(NullAuthenticator),
                authorizer: Arc::new(AllowAllAuthorizer),
            }
        }
        AuthConfig::Jwt { secret } => AuthState {
            authenticator: Arc::new(JwtAuthenticator::new(secret.as_bytes())),
            authorizer: Arc::new(RoleAuthorizer::default()),
        },
    };

    // The stock binary ships without a SPIRE client binding; deployments
    // embed the gateway as a library and inject their own. Every SPIRE route
    // then answers 500 with the unconfigured-client message.
    let ctx = GatewayContext::new(
        Arc::new(NullSpireClient),
        Arc::new(MemoryGatewayStore::new()),
        GatewayContext::server_info_from_config(&config),
    );

    let spa = SpaService::new(&config.static_root, &config.index_file);
    let router = app::build_app(ctx, auth, spa);

    listener::serve(&config, router).await
}
