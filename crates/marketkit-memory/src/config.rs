//! Configuration for the static-token auth providers.

use std::fmt;
use std::time::Duration;

use marketkit_core::{EndpointConfig, MarketResult};

/// Configuration for [`StaticAuthProvider`](crate::StaticAuthProvider) and
/// its async twin.
///
/// # Example
///
/// ```
/// use marketkit_memory::StaticAuthConfig;
/// use std::time::Duration;
///
/// let config = StaticAuthConfig::new("https://api.example.com/", "secret-token")
///     .with_ttl(Duration::from_secs(3600))
///     .with_refresh(true)
///     .with_endpoint("assets", "v1/assets");
/// assert!(config.endpoints().is_ok());
/// ```
#[derive(Clone)]
pub struct StaticAuthConfig {
    pub(crate) base_url: String,
    pub(crate) token: String,
    pub(crate) ttl: Option<Duration>,
    pub(crate) refreshable: bool,
    pub(crate) endpoints: Vec<(String, String)>,
}

impl StaticAuthConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            ttl: None,
            refreshable: false,
            endpoints: Vec::new(),
        }
    }

    /// Sessions older than `ttl` are re-established on the next
    /// `get_session`. Defaults to never expiring.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Whether `refresh()` is supported. Defaults to `false`, in which case
    /// it fails with `Unsupported`.
    #[must_use]
    pub const fn with_refresh(mut self, refreshable: bool) -> Self {
        self.refreshable = refreshable;
        self
    }

    /// Add a named endpoint, absolute or relative to the base URL.
    #[must_use]
    pub fn with_endpoint(mut self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.endpoints.push((name.into(), target.into()));
        self
    }

    /// Build and validate the endpoint configuration.
    pub fn endpoints(&self) -> MarketResult<EndpointConfig> {
        self.endpoints
            .iter()
            .try_fold(EndpointConfig::new(&self.base_url)?, |config, (name, target)| {
                config.with_endpoint(name.clone(), target)
            })
    }
}

impl fmt::Debug for StaticAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticAuthConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("ttl", &self.ttl)
            .field("refreshable", &self.refreshable)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}
