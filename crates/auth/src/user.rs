/// Identity established for a request by an [`Authenticator`].
///
/// [`Authenticator`]: crate::Authenticator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    subject: String,
    roles: Vec<String>,
}

impl UserInfo {
    pub fn new(subject: impl Into<String>, roles: Vec<String>) -> Self {
        Self { subject: subject.into(), roles }
    }

    /// Identity used when no authentication scheme is configured.
    pub fn anonymous() -> Self {
        Self { subject: String::new(), roles: Vec::new() }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
