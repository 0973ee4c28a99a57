//! Listener orchestration: one or two listeners depending on TLS
//! configuration, with graceful degradation to HTTP-only when the HTTPS
//! configuration is unusable.
//!
//! Terminal listener errors flow over a channel sized to the listener
//! count. The orchestrator drains one report per active listener; on the
//! first failure it shuts down the sibling so a half-alive gateway cannot
//! linger behind a load balancer.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context as _;
use axum::Router;
use axum::body::Body;
use axum::extract::Request;
use axum::http::{Method, StatusCode, header};
use axum::response::Response;
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use tokio::sync::mpsc;

use crate::config::GatewayConfig;
use crate::envelope;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Run the gateway until its listeners terminate.
pub async fn serve(config: &GatewayConfig, router: Router) -> anyhow::Result<()> {
    serve_with_handles(config, router, Handle::new(), Handle::new()).await
}

/// As [`serve`], with caller-supplied handles so tests (and embedders) can
/// observe bound addresses and trigger shutdown.
pub async fn serve_with_handles(
    config: &GatewayConfig,
    router: Router,
    http_handle: Handle,
    https_handle: Handle,
) -> anyhow::Result<()> {
    let http_addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));

    let Some(https) = config.https.as_ref() else {
        tracing::warn!("HTTPS is not configured; traffic to this gateway is unencrypted");
        return serve_http(http_addr, router, http_handle).await;
    };

    let (https_port, cert, key) = match https.validate() {
        Ok(parts) => parts,
        Err(err) => {
            tracing::error!(error = %err, "unusable HTTPS configuration; starting insecure HTTP only");
            return serve_http(http_addr, router, http_handle).await;
        }
    };

    let tls = match RustlsConfig::from_pem_file(cert, key).await {
        Ok(tls) => tls,
        Err(err) => {
            tracing::error!(error = %err, "failed loading TLS material; starting insecure HTTP only");
            return serve_http(http_addr, router, http_handle).await;
        }
    };

    let https_addr = SocketAddr::from(([0, 0, 0, 0], https_port));
    let (tx, mut rx) = mpsc::channel::<(&'static str, std::io::Result<()>)>(2);

    {
        let tx = tx.clone();
        let handle = https_handle.clone();
        tokio::spawn(async move {
            tracing::info!(addr = %https_addr, "starting HTTPS listener");
            let result = axum_server::bind_rustls(https_addr, tls)
                .handle(handle)
                .serve(router.into_make_service())
                .await;
            let _ = tx.send(("https", result)).await;
        });
    }

    {
        let handle = http_handle.clone();
        let redirect = redirect_router(https_port);
        tokio::spawn(async move {
            tracing::info!(addr = %http_addr, "starting HTTP redirect listener");
            let result = axum_server::bind(http_addr)
                .handle(handle)
                .serve(redirect.into_make_service())
                .await;
            let _ = tx.send(("http", result)).await;
        });
    }

    let mut remaining = 2;
    let mut failed = false;
    while remaining > 0 {
        let Some((name, result)) = rx.recv().await else { break };
        remaining -= 1;
        match result {
            Ok(()) => tracing::info!(listener = name, "listener stopped"),
            Err(err) => {
                tracing::error!(listener = name, error = %err, "listener terminated");
                if !failed {
                    failed = true;
                    http_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
                    https_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
                }
            }
        }
    }

    Ok(())
}

async fn serve_http(addr: SocketAddr, router: Router, handle: Handle) -> anyhow::Result<()> {
    tracing::info!(addr = %addr, "starting HTTP listener");
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .with_context(|| format!("serving HTTP on {addr}"))
}

/// Router bound to the plain-HTTP listener when HTTPS is active: GET/HEAD
/// are 302-redirected to the HTTPS origin, everything else is refused.
pub fn redirect_router(https_port: u16) -> Router {
    Router::new().fallback(move |req: Request| async move { redirect_to_https(https_port, &req) })
}

fn redirect_to_https(https_port: u16, req: &Request) -> Response {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return envelope::error_response(StatusCode::BAD_REQUEST, "Use HTTPS");
    }

    // Without a Host header there is no authority to redirect to;
    // `https:///path` is a redirect to nowhere.
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty());
    let Some(host) = host else {
        return envelope::error_response(StatusCode::BAD_REQUEST, "Use HTTPS");
    };
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let target = format!("https://{}{}", with_https_port(host, https_port), path_and_query);

    match Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, &target)
        .body(Body::empty())
    {
        Ok(resp) => resp,
        // Host header contained bytes that cannot appear in a Location
        // value; refuse rather than echo them.
        Err(_) => envelope::error_response(StatusCode::BAD_REQUEST, "Use HTTPS"),
    }
}

fn with_https_port(host: &str, https_port: u16) -> String {
    // IPv6 literal, with or without port.
    if let Some(end) = host.rfind(']') {
        return format!("{}:{https_port}", &host[..=end]);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => {
            format!("{name}:{https_port}")
        }
        _ => format!("{host}:{https_port}"),
    }
}
