//! Session lifecycle state machine.
//!
//! ```text
//! Unopened ──get──▶ Active ──refresh──▶ Refreshing ──▶ Active
//!     │               │
//!     └─────close─────┴──────▶ Closed (terminal)
//! ```
//!
//! [`SessionSlot`] holds at most one live session. Auth providers embed one
//! and pass in the platform-specific open, renew and teardown steps.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MarketError, MarketResult};

/// Observable lifecycle state of a [`SessionSlot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Unopened,
    Active,
    /// A renewal is in flight. The previous session is still usable.
    Refreshing,
    Closed,
}

/// Owner of one session capability.
#[derive(Debug)]
pub struct SessionSlot<S> {
    resource: String,
    state: SessionState,
    session: Option<S>,
}

impl<S> SessionSlot<S> {
    /// Create an unopened slot. `resource` names the owner in errors and logs.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            state: SessionState::Unopened,
            session: None,
        }
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// The live session, if any, without opening one.
    pub const fn current(&self) -> Option<&S> {
        self.session.as_ref()
    }

    /// Return the session, opening it on first use.
    pub fn get_or_open<F>(&mut self, open: F) -> MarketResult<&S>
    where
        F: FnOnce() -> MarketResult<S>,
    {
        self.get_or_open_with(|_| true, open)
    }

    /// Return the session, opening it when absent or when `valid` rejects
    /// the current one.
    ///
    /// An expired session is dropped before `open` runs, so two sessions
    /// never coexist. If `open` fails the slot is left unopened.
    pub fn get_or_open_with<V, F>(&mut self, valid: V, open: F) -> MarketResult<&S>
    where
        V: FnOnce(&S) -> bool,
        F: FnOnce() -> MarketResult<S>,
    {
        self.ensure_open()?;
        self.drop_if_expired(valid);
        if self.session.is_none() {
            let session = open()?;
            self.install(session);
        }
        self.active_session()
    }

    /// Async form of [`get_or_open`](Self::get_or_open).
    pub async fn get_or_open_async<F, Fut>(&mut self, open: F) -> MarketResult<&S>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = MarketResult<S>>,
    {
        self.get_or_open_with_async(|_| true, open).await
    }

    /// Async form of [`get_or_open_with`](Self::get_or_open_with).
    pub async fn get_or_open_with_async<V, F, Fut>(&mut self, valid: V, open: F) -> MarketResult<&S>
    where
        V: FnOnce(&S) -> bool,
        F: FnOnce() -> Fut,
        Fut: Future<Output = MarketResult<S>>,
    {
        self.ensure_open()?;
        self.drop_if_expired(valid);
        if self.session.is_none() {
            let session = open().await?;
            self.install(session);
        }
        self.active_session()
    }

    /// Replace the active session with the one produced by `renew`.
    ///
    /// Only an established session can be refreshed. If `renew` fails the
    /// old session stays in place and the error is returned.
    pub fn refresh_with<F>(&mut self, renew: F) -> MarketResult<()>
    where
        F: FnOnce(&S) -> MarketResult<S>,
    {
        self.ensure_open()?;
        let Some(current) = self.session.as_ref() else {
            return Err(nothing_to_refresh(&self.resource));
        };
        debug!(target: "marketkit.session", resource = %self.resource, "Refreshing session");
        let result = {
            let _refreshing = RefreshGuard::enter(&mut self.state);
            renew(current)
        };
        self.finish_refresh(result)
    }

    /// Async form of [`refresh_with`](Self::refresh_with).
    ///
    /// Dropping the returned future mid-renewal returns the slot to `Active`
    /// with the old session.
    pub async fn refresh_with_async<F, Fut>(&mut self, renew: F) -> MarketResult<()>
    where
        F: FnOnce(&S) -> Fut,
        Fut: Future<Output = MarketResult<S>>,
    {
        self.ensure_open()?;
        let Some(current) = self.session.as_ref() else {
            return Err(nothing_to_refresh(&self.resource));
        };
        debug!(target: "marketkit.session", resource = %self.resource, "Refreshing session");
        let result = {
            let _refreshing = RefreshGuard::enter(&mut self.state);
            renew(current).await
        };
        self.finish_refresh(result)
    }

    /// Close the slot, handing any live session to `teardown`.
    ///
    /// Idempotent: closing a closed or never-opened slot is a no-op. The slot
    /// is `Closed` afterwards even if `teardown` fails.
    pub fn close_with<F>(&mut self, teardown: F) -> MarketResult<()>
    where
        F: FnOnce(S) -> MarketResult<()>,
    {
        self.mark_closed().map_or(Ok(()), teardown)
    }

    /// Close the slot, dropping any live session.
    pub fn close(&mut self) {
        drop(self.mark_closed());
    }

    /// Enter `Closed` and hand back the live session. `None` if there was no
    /// session or the slot was already closed.
    fn mark_closed(&mut self) -> Option<S> {
        if self.is_closed() {
            return None;
        }
        self.state = SessionState::Closed;
        debug!(target: "marketkit.session", resource = %self.resource, "Session closed");
        self.session.take()
    }

    fn ensure_open(&self) -> MarketResult<()> {
        if self.is_closed() {
            Err(MarketError::closed(&self.resource))
        } else {
            Ok(())
        }
    }

    fn drop_if_expired<V>(&mut self, valid: V)
    where
        V: FnOnce(&S) -> bool,
    {
        if self.session.as_ref().is_some_and(|s| !valid(s)) {
            debug!(target: "marketkit.session", resource = %self.resource, "Session expired, re-establishing");
            self.session = None;
            self.state = SessionState::Unopened;
        }
    }

    fn install(&mut self, session: S) {
        self.session = Some(session);
        self.state = SessionState::Active;
        debug!(target: "marketkit.session", resource = %self.resource, "Session established");
    }

    fn active_session(&self) -> MarketResult<&S> {
        self.session
            .as_ref()
            .ok_or_else(|| MarketError::authentication(format!("{} has no session", self.resource)))
    }

    fn finish_refresh(&mut self, result: MarketResult<S>) -> MarketResult<()> {
        match result {
            Ok(session) => {
                self.session = Some(session);
                debug!(target: "marketkit.session", resource = %self.resource, "Session refreshed");
                Ok(())
            }
            Err(err) => {
                debug!(target: "marketkit.session", resource = %self.resource, error = %err, "Session refresh failed");
                Err(err)
            }
        }
    }
}

fn nothing_to_refresh(resource: &str) -> MarketError {
    MarketError::authentication(format!("cannot refresh {resource}: no session established"))
}

/// Holds a slot in `Refreshing` and restores `Active` when dropped, including
/// when an async renewal is abandoned.
struct RefreshGuard<'a> {
    state: &'a mut SessionState,
}

impl<'a> RefreshGuard<'a> {
    fn enter(state: &'a mut SessionState) -> Self {
        *state = SessionState::Refreshing;
        Self { state }
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        *self.state = SessionState::Active;
    }
}
