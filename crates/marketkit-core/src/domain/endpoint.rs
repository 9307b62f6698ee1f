//! Platform endpoint configuration.

use std::collections::BTreeMap;
use std::fmt;

use url::Url;

use crate::error::{MarketError, MarketResult};
use crate::utils::{parse_url, redact_url};

/// Base address plus named endpoint URLs for one platform.
///
/// Immutable once built. Platforms extend it by adding names; an existing
/// name can never be overridden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    base_url: Url,
    endpoints: BTreeMap<String, Url>,
}

impl EndpointConfig {
    /// Create a config from a base URL (must be http or https with a host).
    pub fn new(base_url: &str) -> MarketResult<Self> {
        Ok(Self {
            base_url: parse_url(base_url)?,
            endpoints: BTreeMap::new(),
        })
    }

    /// Add a named endpoint.
    ///
    /// `target` may be absolute or relative to the base URL.
    pub fn with_endpoint(mut self, name: impl Into<String>, target: &str) -> MarketResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MarketError::validation("endpoint name must not be empty"));
        }
        if self.endpoints.contains_key(&name) {
            return Err(MarketError::validation(format!(
                "endpoint '{name}' is already defined"
            )));
        }
        let url = self.join(target)?;
        self.endpoints.insert(name, url);
        Ok(self)
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Look up a named endpoint.
    pub fn endpoint(&self, name: &str) -> Option<&Url> {
        self.endpoints.get(name)
    }

    /// Names of all configured endpoints, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }

    /// Resolve `path` against the base URL.
    pub fn join(&self, path: &str) -> MarketResult<Url> {
        let url = self.base_url.join(path).map_err(|e| {
            MarketError::validation(format!("cannot resolve '{path}' against base URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(MarketError::validation(format!(
                "endpoint scheme '{}' is not http or https",
                url.scheme()
            )));
        }
        Ok(url)
    }
}

impl fmt::Display for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact_url(&self.base_url))?;
        if !self.endpoints.is_empty() {
            write!(f, " [")?;
            for (i, (name, url)) in self.endpoints.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{name}={}", redact_url(url))?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
