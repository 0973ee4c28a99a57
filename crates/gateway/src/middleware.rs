//! AuthN/AuthZ middleware wrapping the authenticated route group.
//!
//! Order per request: OPTIONS short-circuit, authenticate, authorize,
//! dispatch. OPTIONS must always succeed without auth or CORS preflight
//! breaks every browser client.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use trustdeck_auth::{Authenticator, Authorizer};

use crate::envelope;

/// Uniform 401 body. Authentication and authorization failures are
/// deliberately indistinguishable to the client; the specific cause goes to
/// the log sink only.
pub const UNAUTHORIZED_MSG: &str = "Error authorizing request: request not authorized";

#[derive(Clone)]
pub struct AuthState {
    pub authenticator: Arc<dyn Authenticator>,
    pub authorizer: Arc<dyn Authorizer>,
}

pub async fn verification_middleware(
    State(state): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if req.method() == Method::OPTIONS {
        return envelope::preflight();
    }

    let (parts, body) = req.into_parts();

    let user = match state.authenticator.authenticate(&parts) {
        Ok(user) => user,
        Err(err) => {
            tracing::warn!(path = %parts.uri.path(), error = %err, "authentication failed");
            return envelope::error_response(StatusCode::UNAUTHORIZED, UNAUTHORIZED_MSG);
        }
    };

    if let Err(err) = state.authorizer.authorize(&parts, &user) {
        tracing::warn!(
            path = %parts.uri.path(),
            subject = %user.subject(),
            error = %err,
            "authorization failed"
        );
        return envelope::error_response(StatusCode::UNAUTHORIZED, UNAUTHORIZED_MSG);
    }

    next.run(Request::from_parts(parts, body)).await
}
