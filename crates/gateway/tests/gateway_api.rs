use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use trustdeck_auth::{
    AllowAllAuthorizer, AuthnError, Authenticator, Claims, JwtAuthenticator, NullAuthenticator,
    RoleAuthorizer, UserInfo,
};
use trustdeck_gateway::app::build_app;
use trustdeck_gateway::context::{ConsoleServerInfo, GatewayContext};
use trustdeck_gateway::middleware::{AuthState, UNAUTHORIZED_MSG};
use trustdeck_gateway::spa::SpaService;
use trustdeck_gateway::store::MemoryGatewayStore;
use trustdeck_spire::types::{Agent, SpiffeId};
use trustdeck_spire::{InMemorySpireClient, NullSpireClient};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Same router as prod, bound to an ephemeral port.
    async fn spawn(ctx: GatewayContext, auth: AuthState) -> Self {
        let spa = SpaService::new("ui-agent", "index.html");
        let app = build_app(ctx, auth, spa);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn open_auth() -> AuthState {
    AuthState {
        authenticator: Arc::new(NullAuthenticator),
        authorizer: Arc::new(AllowAllAuthorizer),
    }
}

fn jwt_auth(secret: &str) -> AuthState {
    AuthState {
        authenticator: Arc::new(JwtAuthenticator::new(secret.as_bytes())),
        authorizer: Arc::new(RoleAuthorizer::default()),
    }
}

fn ctx_with(spire: Arc<dyn trustdeck_spire::SpireClient>) -> GatewayContext {
    GatewayContext::new(spire, Arc::new(MemoryGatewayStore::new()), None)
}

fn mint_jwt(secret: &str, roles: Vec<&str>) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: "tester".into(),
        roles: roles.into_iter().map(String::from).collect(),
        iat: now - 10,
        exp: now + 600,
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn seeded_spire() -> Arc<InMemorySpireClient> {
    let spire = Arc::new(InMemorySpireClient::new());
    spire.seed_agent(Agent {
        id: SpiffeId { trust_domain: "example.org".into(), path: "/agent/a".into() },
        attestation_type: "join_token".into(),
        ..Agent::default()
    });
    spire.seed_agent(Agent {
        id: SpiffeId { trust_domain: "example.org".into(), path: "/agent/b".into() },
        attestation_type: "k8s_psat".into(),
        ..Agent::default()
    });
    spire
}

/// Fails every request and counts how often it was consulted, to prove the
/// OPTIONS short-circuit never reaches authentication.
struct CountingRejectAll {
    calls: AtomicUsize,
}

impl Authenticator for CountingRejectAll {
    fn authenticate(&self, _parts: &http::request::Parts) -> Result<UserInfo, AuthnError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AuthnError::MissingCredentials)
    }
}

#[tokio::test]
async fn health_and_home_bypass_auth() {
    let reject = Arc::new(CountingRejectAll { calls: AtomicUsize::new(0) });
    let auth = AuthState {
        authenticator: reject.clone(),
        authorizer: Arc::new(AllowAllAuthorizer),
    };
    let srv = TestServer::spawn(ctx_with(Arc::new(NullSpireClient)), auth).await;

    let client = reqwest::Client::new();
    for path in ["/healthz", "/"] {
        let res = client
            .get(format!("{}{}", srv.base_url, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "path {path}");
    }
    assert_eq!(reject.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn options_preflight_short_circuits_before_auth() {
    let reject = Arc::new(CountingRejectAll { calls: AtomicUsize::new(0) });
    let auth = AuthState {
        authenticator: reject.clone(),
        authorizer: Arc::new(AllowAllAuthorizer),
    };
    let srv = TestServer::spawn(ctx_with(Arc::new(NullSpireClient)), auth).await;

    let client = reqwest::Client::new();
    let res = client
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/api/v1/spire/agents", srv.base_url),
        )
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    assert_eq!(reject.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn authn_and_authz_failures_are_indistinguishable() {
    let secret = "test-secret";
    let srv = TestServer::spawn(ctx_with(seeded_spire()), jwt_auth(secret)).await;
    let client = reqwest::Client::new();

    // No credentials at all.
    let no_token = client
        .get(format!("{}/api/v1/spire/agents", srv.base_url))
        .send()
        .await
        .unwrap();

    // Valid token, but a viewer may not mutate.
    let viewer = mint_jwt(secret, vec!["viewer"]);
    let wrong_role = client
        .post(format!("{}/api/v1/spire/agents/ban", srv.base_url))
        .bearer_auth(&viewer)
        .body(json!({"id": {"trust_domain": "example.org", "path": "/agent/a"}}).to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(no_token.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_role.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(no_token.text().await.unwrap(), UNAUTHORIZED_MSG);
    assert_eq!(wrong_role.text().await.unwrap(), UNAUTHORIZED_MSG);
}

#[tokio::test]
async fn role_matrix_viewer_reads_admin_mutates() {
    let secret = "test-secret";
    let srv = TestServer::spawn(ctx_with(seeded_spire()), jwt_auth(secret)).await;
    let client = reqwest::Client::new();

    let viewer = mint_jwt(secret, vec!["viewer"]);
    let res = client
        .get(format!("{}/api/v1/spire/agents", srv.base_url))
        .bearer_auth(&viewer)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let admin = mint_jwt(secret, vec!["admin"]);
    let res = client
        .post(format!("{}/api/v1/spire/agents/ban", srv.base_url))
        .bearer_auth(&admin)
        .body(json!({"id": {"trust_domain": "example.org", "path": "/agent/a"}}).to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "SUCCESS");
}

#[tokio::test]
async fn agents_list_with_empty_body_returns_everything() {
    let srv = TestServer::spawn(ctx_with(seeded_spire()), open_auth()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/v1/spire/agents", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "application/json;charset=UTF-8"
    );
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["agents"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn ban_and_delete_require_a_body() {
    let srv = TestServer::spawn(ctx_with(seeded_spire()), open_auth()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/spire/agents/ban", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.text().await.unwrap(), "Error: no data provided");

    let res = client
        .delete(format!("{}/api/v1/spire/agents", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.text().await.unwrap(), "Error: no data provided");
}

#[tokio::test]
async fn malformed_body_is_rejected_with_parse_error() {
    let srv = TestServer::spawn(ctx_with(seeded_spire()), open_auth()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/v1/spire/agents", srv.base_url))
        .body("{not-json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.text().await.unwrap().starts_with("Error parsing data:"));
}

#[tokio::test]
async fn federation_create_accepts_protobuf_json_keys() {
    let srv = TestServer::spawn(ctx_with(seeded_spire()), open_auth()).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/v1/spire/federations", srv.base_url))
        .body(
            json!({
                "federationRelationships": [{
                    "trustDomain": "other.org",
                    "bundleEndpointUrl": "https://other.org/bundle",
                    "httpsWeb": {}
                }]
            })
            .to_string(),
        )
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["results"][0]["status"]["code"], 0);
    assert_eq!(
        body["results"][0]["federation_relationship"]["trust_domain"],
        "other.org"
    );

    // The relationship is visible through the plain-JSON list route.
    let res = client
        .get(format!("{}/api/v1/spire/federations", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["federation_relationships"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unconfigured_spire_client_reports_500() {
    let srv = TestServer::spawn(ctx_with(Arc::new(NullSpireClient)), open_auth()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/v1/spire/agents", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        res.text().await.unwrap(),
        "Error: no SPIRE server configured"
    );
}

#[tokio::test]
async fn cluster_lifecycle_create_edit_delete() {
    let srv = TestServer::spawn(ctx_with(Arc::new(NullSpireClient)), open_auth()).await;
    let client = reqwest::Client::new();
    let url = format!("{}/api/v1/tornjak/clusters", srv.base_url);

    let cluster = json!({
        "cluster": {
            "name": "east",
            "platform_type": "Kubernetes",
            "domain_name": "example.org",
            "managed_by": "platform-team",
            "agents_list": []
        }
    });
    let res = client.post(&url).body(cluster.to_string()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Duplicate create is a caller error.
    let res = client.post(&url).body(cluster.to_string()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Rename via edit.
    let edit = json!({
        "cluster": {
            "name": "east",
            "edited_name": "east-2",
            "platform_type": "Kubernetes",
            "domain_name": "example.org",
            "managed_by": "platform-team",
            "agents_list": ["spiffe://example.org/agent/a"]
        }
    });
    let res = client.patch(&url).body(edit.to_string()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(&url).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["clusters"][0]["name"], "east-2");

    let res = client
        .delete(&url)
        .body(json!({"cluster": {"name": "east-2"}}).to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(&url).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["clusters"].as_array().unwrap().is_empty());

    // Mutations without a body are refused.
    let res = client.post(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn selector_registration_round_trip() {
    let srv = TestServer::spawn(ctx_with(Arc::new(NullSpireClient)), open_auth()).await;
    let client = reqwest::Client::new();
    let url = format!("{}/api/v1/tornjak/selectors", srv.base_url);

    let res = client
        .post(&url)
        .body(
            json!({"agent": {"spiffe_id": "spiffe://example.org/agent/a", "plugin": "k8s_sat"}})
                .to_string(),
        )
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(&url).send().await.unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["agents"][0]["plugin"], "k8s_sat");

    // Filtered metadata lookup through the agents route.
    let res = client
        .get(format!("{}/api/v1/tornjak/agents", srv.base_url))
        .body(json!({"agents": ["spiffe://example.org/agent/a"]}).to_string())
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["agents"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn console_server_info_204_when_unconfigured() {
    let srv = TestServer::spawn(ctx_with(Arc::new(NullSpireClient)), open_auth()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/v1/tornjak/serverinfo", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(res.headers().get("access-control-allow-origin").unwrap(), "*");
    assert!(res.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn console_server_info_served_when_configured() {
    let ctx = GatewayContext::new(
        Arc::new(NullSpireClient),
        Arc::new(MemoryGatewayStore::new()),
        Some(ConsoleServerInfo {
            spire_server_addr: "unix:///tmp/spire-server/private/api.sock".into(),
            spire_server_config: "trust_domain = \"example.org\"".into(),
        }),
    );
    let srv = TestServer::spawn(ctx, open_auth()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/v1/tornjak/serverinfo", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["spire_server_addr"],
        "unix:///tmp/spire-server/private/api.sock"
    );
}

#[tokio::test]
async fn spa_fallback_rejects_traversal_paths() {
    use axum::body::Body;
    use tower::ServiceExt;

    // reqwest normalizes dot segments, so drive the router directly with a
    // raw URI the way a hand-crafted client would.
    let spa = SpaService::new("ui-agent", "index.html");
    let app = build_app(ctx_with(Arc::new(NullSpireClient)), open_auth(), spa);

    // Plain and percent-encoded dot segments must be caught alike; the
    // encoded form only becomes ".." after decoding.
    for uri in [
        "/static/../../etc/passwd",
        "/%2e%2e/%2e%2e/etc/passwd",
        "/static/%2E%2E/%2E%2E/etc/passwd",
    ] {
        let req = axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let res = app.clone().oneshot(req).await.unwrap();

        assert_eq!(res.status(), axum::http::StatusCode::BAD_REQUEST, "uri {uri}");
        let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"Error: invalid asset path", "uri {uri}");
    }
}
