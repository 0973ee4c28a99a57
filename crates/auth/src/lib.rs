//! `trustdeck-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from the HTTP server and from
//! storage: it sees `http::request::Parts` and nothing else. The gateway's
//! middleware drives the two traits defined here; which implementations are
//! wired in is a deployment decision.

pub mod authenticate;
pub mod authorize;
pub mod claims;
pub mod user;

pub use authenticate::{AuthnError, Authenticator, JwtAuthenticator, NullAuthenticator};
pub use authorize::{AllowAllAuthorizer, AuthzError, Authorizer, RoleAuthorizer};
pub use claims::{Claims, TokenValidationError, validate_claims};
pub use user::UserInfo;
