//! Authentication provider ports.
//!
//! An `AuthProvider` owns the session capability for one platform and the
//! endpoint configuration that goes with it. The session type is opaque to
//! the core: clients receive a reference and hand it back to platform code.
//!
//! Implementations usually delegate lifecycle bookkeeping to
//! [`SessionSlot`](crate::session::SessionSlot).

use async_trait::async_trait;

use crate::domain::EndpointConfig;
use crate::error::{MarketError, MarketResult};

/// Blocking authentication provider.
pub trait AuthProvider {
    /// Authenticated channel handed to platform request code.
    type Session;

    /// The current session, establishing (or re-establishing) it if needed.
    ///
    /// Fails with `ResourceClosed` after [`close`](Self::close).
    fn get_session(&mut self) -> MarketResult<&Self::Session>;

    /// Endpoint configuration. Pure, performs no I/O.
    fn get_endpoints(&self) -> &EndpointConfig;

    /// Renew credentials.
    ///
    /// Platforms without a refresh concept keep the default, which fails
    /// with `Unsupported`.
    fn refresh(&mut self) -> MarketResult<()> {
        Err(MarketError::unsupported("refresh", self.provider_name()))
    }

    /// Release the session. Idempotent and safe on a never-opened provider.
    fn close(&mut self) -> MarketResult<()>;

    /// Name used in error messages.
    fn provider_name(&self) -> &str {
        short_type_name::<Self>()
    }
}

/// Async authentication provider.
///
/// Same contract as [`AuthProvider`]; session acquisition may suspend.
#[async_trait]
pub trait AsyncAuthProvider: Send {
    type Session: Send + Sync;

    async fn get_session(&mut self) -> MarketResult<&Self::Session>;

    fn get_endpoints(&self) -> &EndpointConfig;

    async fn refresh(&mut self) -> MarketResult<()> {
        Err(MarketError::unsupported("refresh", self.provider_name()))
    }

    async fn close(&mut self) -> MarketResult<()>;

    fn provider_name(&self) -> &str {
        short_type_name::<Self>()
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
