//! Remote store configuration

/// Connection settings for the hosted realtime database
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Database URL (e.g., "https://example-rtdb.europe-west1.firebasedatabase.app")
    pub base_url: String,

    /// Database auth token, sent as the `auth` query parameter
    pub auth_token: Option<String>,

    /// Request timeout in seconds (not applied to the event stream)
    pub timeout: u64,

    /// Connect timeout in seconds
    pub connect_timeout: u64,
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: None,
            timeout: 30,
            connect_timeout: 10,
        }
    }

    /// Set the auth token
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Build an HTTP remote from this configuration
    pub fn build_http_remote(&self) -> crate::SyncResult<crate::HttpRemote> {
        crate::HttpRemote::new(self)
    }
}
