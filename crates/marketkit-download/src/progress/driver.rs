//! Protocol-enforcing wrappers around an optional progress callback.
//!
//! The engines report through a driver rather than the callback directly, so
//! ordering holds even on unusual paths: `start` at most once, progress only
//! after start and never decreasing, and exactly one terminal event.

use marketkit_core::{AsyncProgressCallback, MarketError, ProgressCallback};

#[derive(Debug, Default, Clone, Copy)]
struct Protocol {
    started: bool,
    finished: bool,
    last: u64,
}

impl Protocol {
    fn start(&mut self) -> bool {
        if self.started || self.finished {
            return false;
        }
        self.started = true;
        true
    }

    fn progress(&mut self, current: u64) -> bool {
        if !self.started || self.finished || current < self.last {
            return false;
        }
        self.last = current;
        true
    }

    fn finish(&mut self) -> bool {
        if self.finished {
            return false;
        }
        self.finished = true;
        true
    }
}

/// Blocking progress driver.
pub struct ProgressDriver<'a> {
    callback: Option<&'a mut dyn ProgressCallback>,
    protocol: Protocol,
}

impl<'a> ProgressDriver<'a> {
    pub fn new(callback: Option<&'a mut dyn ProgressCallback>) -> Self {
        Self {
            callback,
            protocol: Protocol::default(),
        }
    }

    pub fn start(&mut self, total: Option<u64>) {
        if self.protocol.start() {
            if let Some(cb) = self.callback.as_deref_mut() {
                cb.on_start(total);
            }
        }
    }

    pub fn progress(&mut self, current: u64, total: Option<u64>) {
        if self.protocol.progress(current) {
            if let Some(cb) = self.callback.as_deref_mut() {
                cb.on_progress(current, total);
            }
        }
    }

    pub fn complete(&mut self) {
        if self.protocol.finish() {
            if let Some(cb) = self.callback.as_deref_mut() {
                cb.on_complete();
            }
        }
    }

    pub fn error(&mut self, error: &MarketError) {
        if self.protocol.finish() {
            if let Some(cb) = self.callback.as_deref_mut() {
                cb.on_error(error);
            }
        }
    }

    /// Whether a terminal event was reported.
    pub const fn is_finished(&self) -> bool {
        self.protocol.finished
    }
}

/// Async progress driver.
pub struct AsyncProgressDriver<'a> {
    callback: Option<&'a mut dyn AsyncProgressCallback>,
    protocol: Protocol,
}

impl<'a> AsyncProgressDriver<'a> {
    pub fn new(callback: Option<&'a mut dyn AsyncProgressCallback>) -> Self {
        Self {
            callback,
            protocol: Protocol::default(),
        }
    }

    pub async fn start(&mut self, total: Option<u64>) {
        if self.protocol.start() {
            if let Some(cb) = self.callback.as_deref_mut() {
                cb.on_start(total).await;
            }
        }
    }

    pub async fn progress(&mut self, current: u64, total: Option<u64>) {
        if self.protocol.progress(current) {
            if let Some(cb) = self.callback.as_deref_mut() {
                cb.on_progress(current, total).await;
            }
        }
    }

    pub async fn complete(&mut self) {
        if self.protocol.finish() {
            if let Some(cb) = self.callback.as_deref_mut() {
                cb.on_complete().await;
            }
        }
    }

    pub async fn error(&mut self, error: &MarketError) {
        if self.protocol.finish() {
            if let Some(cb) = self.callback.as_deref_mut() {
                cb.on_error(error).await;
            }
        }
    }

    pub const fn is_finished(&self) -> bool {
        self.protocol.finished
    }
}
