//! Client configuration

/// Default catalog/auth host
pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

/// Client configuration for the catalog and auth endpoints
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "https://dummyjson.com")
    pub base_url: String,

    /// Bearer token sent with every request, if any
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout in seconds
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
