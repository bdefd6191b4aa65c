//! Owner API client configuration.

use serde::Deserialize;

/// Connection settings for the owner API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OwnerApiConfig {
    /// Scheme and host of the API, without trailing path.
    pub base_url: String,
    /// OAuth client id of the official mobile app.
    pub client_id: String,
    /// OAuth client secret of the official mobile app.
    pub client_secret: String,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
}

impl Default for OwnerApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://owner-api.teslamotors.com".to_string(),
            client_id: "81527cff06843c8634fdc09e8ac0abefb46ac849f38fe1e431c2ef2106796384"
                .to_string(),
            client_secret: "c7257eb71a564034f9419ee651c7d0e5f7aa6bfbd18bafb5c5c033b093bb2fa3"
                .to_string(),
            timeout_secs: 30,
        }
    }
}

impl OwnerApiConfig {
    /// Join `path` onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}
