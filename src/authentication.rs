use secrecy::{ExposeSecret, Secret};

/// Shared secret guarding the export route, loaded once at startup.
#[derive(Clone)]
pub struct ApiKey(Secret<String>);

impl ApiKey {
    pub fn new(secret: Secret<String>) -> Self {
        Self(secret)
    }

    /// Exact string comparison against the configured secret. An absent
    /// candidate never matches.
    pub fn matches(&self, candidate: Option<&str>) -> bool {
        candidate.is_some_and(|candidate| candidate == self.0.expose_secret())
    }
}
