//! Static-token auth providers.
//!
//! The "session" is a bearer token stamped with its issue time. Expiry is
//! simulated with the configured TTL; refresh issues a new generation of the
//! same token.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use marketkit_core::{
    AsyncAuthProvider, AuthProvider, EndpointConfig, MarketError, MarketResult, SessionSlot,
    SessionState,
};
use tracing::debug;

use crate::config::StaticAuthConfig;

/// Bearer-token session capability.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSession {
    token: String,
    generation: u64,
    issued_at: Instant,
}

impl TokenSession {
    fn issue(token: &str, generation: u64) -> Self {
        Self {
            token: token.to_string(),
            generation,
            issued_at: Instant::now(),
        }
    }

    /// Value for an `Authorization: Bearer` header.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// 1 for the first session, incremented on every open or refresh.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    fn is_valid(&self, ttl: Option<Duration>) -> bool {
        ttl.is_none_or(|ttl| self.issued_at.elapsed() < ttl)
    }
}

impl fmt::Debug for TokenSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSession")
            .field("token", &"<redacted>")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// State shared by the blocking and async providers.
#[derive(Debug)]
struct TokenIssuer {
    config: StaticAuthConfig,
    endpoints: EndpointConfig,
    slot: SessionSlot<TokenSession>,
    generation: u64,
}

impl TokenIssuer {
    fn new(config: StaticAuthConfig, name: &str) -> MarketResult<Self> {
        if config.token.trim().is_empty() {
            return Err(MarketError::authentication("token must not be empty"));
        }
        let endpoints = config.endpoints()?;
        Ok(Self {
            config,
            endpoints,
            slot: SessionSlot::new(name),
            generation: 0,
        })
    }

    fn session(&mut self) -> MarketResult<&TokenSession> {
        let ttl = self.config.ttl;
        let token = &self.config.token;
        let generation = &mut self.generation;
        self.slot.get_or_open_with(
            |session| session.is_valid(ttl),
            || {
                *generation += 1;
                Ok(TokenSession::issue(token, *generation))
            },
        )
    }

    fn refresh(&mut self, provider: &str) -> MarketResult<()> {
        if !self.config.refreshable {
            return Err(MarketError::unsupported("refresh", provider));
        }
        let generation = &mut self.generation;
        self.slot.refresh_with(|old| {
            *generation += 1;
            Ok(TokenSession::issue(&old.token, *generation))
        })
    }

    fn close(&mut self) -> MarketResult<()> {
        self.slot.close_with(|session| {
            debug!(
                target: "marketkit.session",
                generation = session.generation,
                "Revoking static token session"
            );
            Ok(())
        })
    }
}

/// Blocking provider backed by a static bearer token.
#[derive(Debug)]
pub struct StaticAuthProvider {
    issuer: TokenIssuer,
}

impl StaticAuthProvider {
    /// Fails with `Validation` on a bad base URL or duplicate endpoint, and
    /// with `Authentication` on an empty token.
    pub fn new(config: StaticAuthConfig) -> MarketResult<Self> {
        Ok(Self {
            issuer: TokenIssuer::new(config, "StaticAuthProvider")?,
        })
    }

    pub const fn state(&self) -> SessionState {
        self.issuer.slot.state()
    }

    /// Number of sessions issued so far (opens plus refreshes).
    pub const fn sessions_issued(&self) -> u64 {
        self.issuer.generation
    }
}

impl AuthProvider for StaticAuthProvider {
    type Session = TokenSession;

    fn get_session(&mut self) -> MarketResult<&TokenSession> {
        self.issuer.session()
    }

    fn get_endpoints(&self) -> &EndpointConfig {
        &self.issuer.endpoints
    }

    fn refresh(&mut self) -> MarketResult<()> {
        let name = self.provider_name().to_string();
        self.issuer.refresh(&name)
    }

    fn close(&mut self) -> MarketResult<()> {
        self.issuer.close()
    }
}

/// Async provider backed by a static bearer token.
#[derive(Debug)]
pub struct AsyncStaticAuthProvider {
    issuer: TokenIssuer,
}

impl AsyncStaticAuthProvider {
    pub fn new(config: StaticAuthConfig) -> MarketResult<Self> {
        Ok(Self {
            issuer: TokenIssuer::new(config, "AsyncStaticAuthProvider")?,
        })
    }

    pub const fn state(&self) -> SessionState {
        self.issuer.slot.state()
    }

    pub const fn sessions_issued(&self) -> u64 {
        self.issuer.generation
    }
}

#[async_trait]
impl AsyncAuthProvider for AsyncStaticAuthProvider {
    type Session = TokenSession;

    async fn get_session(&mut self) -> MarketResult<&TokenSession> {
        self.issuer.session()
    }

    fn get_endpoints(&self) -> &EndpointConfig {
        &self.issuer.endpoints
    }

    async fn refresh(&mut self) -> MarketResult<()> {
        let name = self.provider_name().to_string();
        self.issuer.refresh(&name)
    }

    async fn close(&mut self) -> MarketResult<()> {
        self.issuer.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StaticAuthConfig {
        StaticAuthConfig::new("https://api.example.com/", "tok-123")
    }

    #[test]
    fn test_session_reused_while_valid() {
        let mut provider = StaticAuthProvider::new(config()).unwrap();
        assert_eq!(provider.state(), SessionState::Unopened);

        assert_eq!(provider.get_session().unwrap().token(), "tok-123");
        assert_eq!(provider.get_session().unwrap().generation(), 1);
        assert_eq!(provider.sessions_issued(), 1);
        assert_eq!(provider.state(), SessionState::Active);
    }

    #[test]
    fn test_expired_session_reissued() {
        let mut provider =
            StaticAuthProvider::new(config().with_ttl(Duration::from_millis(10))).unwrap();
        assert_eq!(provider.get_session().unwrap().generation(), 1);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(provider.get_session().unwrap().generation(), 2);
    }

    #[test]
    fn test_refresh_unsupported_by_default() {
        let mut provider = StaticAuthProvider::new(config()).unwrap();
        provider.get_session().unwrap();
        match provider.refresh() {
            Err(MarketError::Unsupported { provider, .. }) => {
                assert_eq!(provider, "StaticAuthProvider");
            }
            other => panic!("Expected Unsupported, got {other:?}"),
        }
        assert_eq!(provider.state(), SessionState::Active);
    }

    #[test]
    fn test_refresh_issues_new_generation() {
        let mut provider = StaticAuthProvider::new(config().with_refresh(true)).unwrap();
        provider.get_session().unwrap();
        provider.refresh().unwrap();
        assert_eq!(provider.get_session().unwrap().generation(), 2);
    }

    #[test]
    fn test_close_idempotent_then_closed() {
        let mut provider = StaticAuthProvider::new(config()).unwrap();
        provider.close().unwrap();
        provider.close().unwrap();
        assert_eq!(provider.state(), SessionState::Closed);
        assert!(matches!(
            provider.get_session(),
            Err(MarketError::ResourceClosed { .. })
        ));
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(
            StaticAuthProvider::new(StaticAuthConfig::new("https://x.example", " ")),
            Err(MarketError::Authentication { .. })
        ));
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let mut provider = StaticAuthProvider::new(config()).unwrap();
        let shown = format!("{:?}", provider.get_session().unwrap());
        assert!(!shown.contains("tok-123"));
    }

    #[tokio::test]
    async fn test_async_provider_lifecycle() {
        let mut provider = AsyncStaticAuthProvider::new(config()).unwrap();
        assert_eq!(provider.get_session().await.unwrap().generation(), 1);
        assert!(provider.refresh().await.is_err());
        provider.close().await.unwrap();
        provider.close().await.unwrap();
        assert!(provider.get_session().await.is_err());
        assert_eq!(provider.state(), SessionState::Closed);
    }
}
