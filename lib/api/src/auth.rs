//! Shared-secret request authentication
//!
//! Requests authenticate by presenting the configured shared secret in
//! a header. There are no users or sessions; every authenticated caller
//! has the same access.

use actix_web::HttpRequest;

/// Header clients present the shared secret in.
pub const SHARED_SECRET_HEADER: &str = "matchmaker-sharedsecret";

/// Authentication settings for the REST API.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Secret clients must present. `None` means no secret is
    /// configured, in which case nothing authenticates unless checks
    /// are disabled.
    pub shared_secret: Option<String>,
    /// Disable authentication entirely. Meant for local development.
    pub skip_authentication: bool,
}

impl AuthConfig {
    /// Read settings from the `SHARED_SECRET` and `SKIP_AUTHENTICATION`
    /// environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            shared_secret: std::env::var("SHARED_SECRET").ok(),
            skip_authentication: std::env::var("SKIP_AUTHENTICATION")
                .map(|value| value == "true")
                .unwrap_or(false),
        }
    }

    /// Does `request` carry the configured shared secret?
    #[must_use]
    pub fn authenticate(&self, request: &HttpRequest) -> bool {
        if self.skip_authentication {
            return true;
        }
        let Some(secret) = self.shared_secret.as_deref() else {
            return false;
        };
        request
            .headers()
            .get(SHARED_SECRET_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value == secret)
            .unwrap_or(false)
    }
}
