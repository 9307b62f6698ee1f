//! Scoped client acquisition.
//!
//! `with_client` runs caller logic against a client and closes it on every
//! exit path. If the caller's logic fails and `close()` fails too, the
//! caller's error wins and the close error is logged.

use tracing::warn;

use crate::error::MarketResult;
use crate::ports::{AsyncMarketplaceClient, MarketplaceClient};

/// Closes the client on drop unless it was already closed explicitly.
struct CloseGuard<C: MarketplaceClient> {
    client: C,
    closed: bool,
}

impl<C: MarketplaceClient> CloseGuard<C> {
    fn close(&mut self) -> MarketResult<()> {
        self.closed = true;
        self.client.close()
    }
}

impl<C: MarketplaceClient> Drop for CloseGuard<C> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(err) = self.client.close() {
                warn!(target: "marketkit.session", error = %err, "Failed to close client during unwind");
            }
        }
    }
}

/// Run `f` with `client`, closing it afterwards.
///
/// The client is closed on success, on error and while unwinding from a
/// panic in `f`.
pub fn with_client<C, T, F>(client: C, f: F) -> MarketResult<T>
where
    C: MarketplaceClient,
    F: FnOnce(&mut C) -> MarketResult<T>,
{
    let mut guard = CloseGuard {
        client,
        closed: false,
    };
    let result = f(&mut guard.client);
    let closed = guard.close();
    merge(result, closed)
}

/// Async form of [`with_client`].
///
/// The client is closed after `f` resolves, whether it returned `Ok` or
/// `Err`. A future dropped before completion does not close the client.
pub async fn with_client_async<C, T, F>(mut client: C, f: F) -> MarketResult<T>
where
    C: AsyncMarketplaceClient,
    F: AsyncFnOnce(&mut C) -> MarketResult<T>,
{
    let result = f(&mut client).await;
    let closed = client.close().await;
    merge(result, closed)
}

fn merge<T>(result: MarketResult<T>, closed: MarketResult<()>) -> MarketResult<T> {
    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            warn!(target: "marketkit.session", error = %close_err, "Failed to close client after error");
            Err(err)
        }
    }
}
