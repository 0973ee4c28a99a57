//! Request authentication schemes.
//!
//! The gateway treats authentication as a pluggable seam: every non-OPTIONS
//! request passes through exactly one [`Authenticator`] before routing.

use chrono::Utc;
use http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::claims::{Claims, validate_claims};
use crate::user::UserInfo;

#[derive(Debug, Error)]
pub enum AuthnError {
    #[error("missing Authorization header")]
    MissingCredentials,

    #[error("malformed Authorization header")]
    MalformedHeader,

    #[error("invalid token: {0}")]
    InvalidToken(String),
}

/// Establishes an identity for a request, or fails.
///
/// Implementations must be cheap and side-effect free; they run on every
/// request. Failures are reported to the client as a uniform 401 by the
/// middleware, so error variants here exist for the log sink only.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, parts: &Parts) -> Result<UserInfo, AuthnError>;
}

/// No-op scheme: every request is anonymous and accepted.
///
/// This is the default when no auth mode is configured and pairs with
/// [`AllowAllAuthorizer`](crate::AllowAllAuthorizer).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAuthenticator;

impl Authenticator for NullAuthenticator {
    fn authenticate(&self, _parts: &Parts) -> Result<UserInfo, AuthnError> {
        Ok(UserInfo::anonymous())
    }
}

/// HS256 bearer-token scheme.
///
/// Verifies the signature with a shared secret, then validates the claim
/// time window. Roles are taken from the `roles` claim.
pub struct JwtAuthenticator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Time-window checks live in validate_claims so they are testable
        // without minting real tokens.
        validation.validate_exp = false;
        Self { key: DecodingKey::from_secret(secret), validation }
    }
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, parts: &Parts) -> Result<UserInfo, AuthnError> {
        let token = extract_bearer(parts)?;

        let data = jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| AuthnError::InvalidToken(e.to_string()))?;

        validate_claims(&data.claims, Utc::now())
            .map_err(|e| AuthnError::InvalidToken(e.to_string()))?;

        Ok(UserInfo::new(data.claims.sub, data.claims.roles))
    }
}

fn extract_bearer(parts: &Parts) -> Result<&str, AuthnError> {
    let header = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .ok_or(AuthnError::MissingCredentials)?;

    let header = header.to_str().map_err(|_| AuthnError::MalformedHeader)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthnError::MalformedHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthnError::MalformedHeader);
    }

    Ok(token)
}
