//! Request authorization policies.

use http::Method;
use http::request::Parts;
use thiserror::Error;

use crate::user::UserInfo;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("no role held by the user permits this operation")]
    MissingRole,
}

/// Decides whether an authenticated identity may perform the request.
///
/// Runs after [`Authenticator`](crate::Authenticator) on every non-OPTIONS
/// request; a non-OK result short-circuits the request with 401.
pub trait Authorizer: Send + Sync {
    fn authorize(&self, parts: &Parts, user: &UserInfo) -> Result<(), AuthzError>;
}

/// Permits every request. Pairs with [`NullAuthenticator`](crate::NullAuthenticator).
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAllAuthorizer;

impl Authorizer for AllowAllAuthorizer {
    fn authorize(&self, _parts: &Parts, _user: &UserInfo) -> Result<(), AuthzError> {
        Ok(())
    }
}

/// Role-based policy over HTTP methods.
///
/// Reads (GET/HEAD) are open to viewers and admins; every mutating method
/// requires the admin role. Paths are not consulted: the route table already
/// partitions authenticated from unauthenticated surfaces.
#[derive(Debug, Clone)]
pub struct RoleAuthorizer {
    admin_role: String,
    viewer_role: String,
}

impl RoleAuthorizer {
    pub fn new(admin_role: impl Into<String>, viewer_role: impl Into<String>) -> Self {
        Self { admin_role: admin_role.into(), viewer_role: viewer_role.into() }
    }
}

impl Default for RoleAuthorizer {
    fn default() -> Self {
        Self::new("admin", "viewer")
    }
}

impl Authorizer for RoleAuthorizer {
    fn authorize(&self, parts: &Parts, user: &UserInfo) -> Result<(), AuthzError> {
        let allowed = if parts.method == Method::GET || parts.method == Method::HEAD {
            user.has_role(&self.admin_role) || user.has_role(&self.viewer_role)
        } else {
            user.has_role(&self.admin_role)
        };

        if allowed { Ok(()) } else { Err(AuthzError::MissingRole) }
    }
}
