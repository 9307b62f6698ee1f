//! Progress protocol callbacks.
//!
//! The download engine calls these in a fixed order per invocation:
//! `on_start` once, `on_progress` with non-decreasing `current`, then exactly
//! one of `on_complete` or `on_error`.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::MarketError;
use crate::events::ProgressEvent;

/// Blocking progress callback.
#[cfg_attr(test, mockall::automock)]
pub trait ProgressCallback {
    fn on_start(&mut self, total: Option<u64>);
    fn on_progress(&mut self, current: u64, total: Option<u64>);
    fn on_complete(&mut self);
    fn on_error(&mut self, error: &MarketError);
}

/// Async progress callback for the cooperative contract.
#[async_trait]
pub trait AsyncProgressCallback: Send {
    async fn on_start(&mut self, total: Option<u64>);
    async fn on_progress(&mut self, current: u64, total: Option<u64>);
    async fn on_complete(&mut self);
    async fn on_error(&mut self, error: &MarketError);
}

/// Callback that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_start(&mut self, _total: Option<u64>) {}
    fn on_progress(&mut self, _current: u64, _total: Option<u64>) {}
    fn on_complete(&mut self) {}
    fn on_error(&mut self, _error: &MarketError) {}
}

#[async_trait]
impl AsyncProgressCallback for NoopProgress {
    async fn on_start(&mut self, _total: Option<u64>) {}
    async fn on_progress(&mut self, _current: u64, _total: Option<u64>) {}
    async fn on_complete(&mut self) {}
    async fn on_error(&mut self, _error: &MarketError) {}
}

/// Callback that records every event it receives.
///
/// Clones share the same log, so a clone can be handed to a client while the
/// original is inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct ProgressRecorder {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl ProgressRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The `current` values of all `Progress` events, in order.
    pub fn progress_values(&self) -> Vec<u64> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::Progress { current, .. } => Some(current),
                _ => None,
            })
            .collect()
    }

    /// Check the recorded sequence against the protocol.
    ///
    /// A lone `Error` is accepted: it is what a download that fails before
    /// starting (bad filename, directory escape) reports. Returns a
    /// description of the first violation found.
    pub fn verify(&self) -> Result<(), String> {
        let events = self.events();
        let Some((first, rest)) = events.split_first() else {
            return Err("no events recorded".to_string());
        };
        if rest.is_empty() && matches!(first, ProgressEvent::Error { .. }) {
            return Ok(());
        }
        if !matches!(first, ProgressEvent::Start { .. }) {
            return Err(format!("first event is {first:?}, expected Start"));
        }
        let Some((last, middle)) = rest.split_last() else {
            return Err("no terminal event".to_string());
        };
        if !last.is_terminal() {
            return Err(format!("last event is {last:?}, expected Complete or Error"));
        }

        let mut previous = 0;
        for event in middle {
            match event {
                ProgressEvent::Progress { current, .. } if *current >= previous => {
                    previous = *current;
                }
                other => return Err(format!("unexpected event {other:?} mid-stream")),
            }
        }
        Ok(())
    }
}

impl ProgressCallback for ProgressRecorder {
    fn on_start(&mut self, total: Option<u64>) {
        self.push(ProgressEvent::Start { total });
    }

    fn on_progress(&mut self, current: u64, total: Option<u64>) {
        self.push(ProgressEvent::Progress { current, total });
    }

    fn on_complete(&mut self) {
        self.push(ProgressEvent::Complete);
    }

    fn on_error(&mut self, error: &MarketError) {
        self.push(ProgressEvent::error(error));
    }
}

#[async_trait]
impl AsyncProgressCallback for ProgressRecorder {
    async fn on_start(&mut self, total: Option<u64>) {
        self.push(ProgressEvent::Start { total });
    }

    async fn on_progress(&mut self, current: u64, total: Option<u64>) {
        self.push(ProgressEvent::Progress { current, total });
    }

    async fn on_complete(&mut self) {
        self.push(ProgressEvent::Complete);
    }

    async fn on_error(&mut self, error: &MarketError) {
        self.push(ProgressEvent::error(error));
    }
}
