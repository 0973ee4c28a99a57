use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT claims model (transport-agnostic).
///
/// The minimal set of claims the gateway expects once a token has been
/// decoded and its signature verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject / principal identifier.
    pub sub: String,

    /// Roles granted to the subject (e.g. `admin`, `viewer`).
    #[serde(default)]
    pub roles: Vec<String>,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,

    /// Expiration, seconds since the Unix epoch.
    pub exp: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate JWT claims.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// is the caller's concern.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now.timestamp() < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now.timestamp() >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn claims(iat: i64, exp: i64) -> Claims {
        Claims { sub: "u".into(), roles: vec![], iat, exp }
    }

    #[test]
    fn accepts_token_inside_window() {
        let now = Utc.timestamp_opt(1_000, 0).unwrap();
        assert_eq!(validate_claims(&claims(900, 1_100), now), Ok(()));
    }

    #[test]
    fn rejects_expired_token() {
        let now = Utc.timestamp_opt(1_200, 0).unwrap();
        assert_eq!(
            validate_claims(&claims(900, 1_100), now),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn rejects_token_from_the_future() {
        let now = Utc.timestamp_opt(800, 0).unwrap();
        assert_eq!(
            validate_claims(&claims(900, 1_100), now),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn rejects_inverted_window() {
        let now = Utc.timestamp_opt(1_000, 0).unwrap();
        assert_eq!(
            validate_claims(&claims(1_100, 900), now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }
}
