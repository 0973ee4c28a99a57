//! Uniform response envelope: CORS headers and error formatting.
//!
//! Every response path (success, error, the OPTIONS short-circuit) must
//! carry the same CORS header set; a divergence breaks cross-origin UI
//! calls in ways only visible in the browser console. Keep all header
//! writing in this module.

use axum::body::Body;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::Response;
use serde::Serialize;

const ALLOW_METHODS: &str = "POST, GET, OPTIONS, DELETE, PATCH";
const ALLOW_HEADERS: &str = "Content-Type, access-control-allow-origin, \
    access-control-allow-headers, access-control-allow-credentials, \
    Authorization, access-control-allow-methods";
const EXPOSE_HEADERS: &str = "*, Authorization";

fn apply_cors(resp: &mut Response) {
    let headers = resp.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static(EXPOSE_HEADERS),
    );
}

/// Serialize a handler result as the JSON success envelope.
///
/// A serialization failure is surfaced as 400, not 500: it means a handler
/// produced a value the public contract cannot carry, which is a
/// client-visible bug rather than a transient server fault.
pub fn json_response<T: Serialize>(value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => {
            let mut resp = Response::new(Body::from(body));
            resp.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json;charset=UTF-8"),
            );
            apply_cors(&mut resp);
            resp
        }
        Err(e) => error_response(StatusCode::BAD_REQUEST, format!("Error: {e}")),
    }
}

/// Plain-text error body with the full CORS set and the given status.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let mut resp = Response::new(Body::from(message.into()));
    *resp.status_mut() = status;
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    apply_cors(&mut resp);
    resp
}

/// 200 with CORS headers and an empty body, for OPTIONS preflight.
pub fn preflight() -> Response {
    let mut resp = Response::new(Body::empty());
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json;charset=UTF-8"),
    );
    apply_cors(&mut resp);
    resp
}

/// 204 with the CORS set and no body. A 204 must not carry content, so any
/// diagnostic belongs in the log sink, not here.
pub fn no_content() -> Response {
    let mut resp = Response::new(Body::empty());
    *resp.status_mut() = StatusCode::NO_CONTENT;
    apply_cors(&mut resp);
    resp
}

/// Plain "SUCCESS" body used by mutations that return no data.
pub fn success_response() -> Response {
    let mut resp = Response::new(Body::from("SUCCESS"));
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json;charset=UTF-8"),
    );
    apply_cors(&mut resp);
    resp
}
