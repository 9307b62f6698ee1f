//! Progress callback that writes to the `tracing` log.

use async_trait::async_trait;
use marketkit_core::utils::format_bytes;
use marketkit_core::{AsyncProgressCallback, MarketError, ProgressCallback};
use tracing::{debug, warn};

use super::throttle::ProgressThrottle;

/// Logs progress events under `target: "marketkit.download"`.
///
/// Start and completion are logged at `debug`, failures at `warn`. Progress
/// lines go through a [`ProgressThrottle`].
#[derive(Debug, Clone)]
pub struct TracingProgress {
    label: String,
    throttle: ProgressThrottle,
    last: u64,
}

impl TracingProgress {
    /// `label` identifies the download in log lines (usually the asset uid).
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            throttle: ProgressThrottle::default(),
            last: 0,
        }
    }

    #[must_use]
    pub const fn with_throttle(mut self, throttle: ProgressThrottle) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn log_start(&mut self, total: Option<u64>) {
        self.throttle.restart();
        debug!(
            target: "marketkit.download",
            label = %self.label,
            total = total.map(format_bytes).as_deref().unwrap_or("unknown"),
            "Download started"
        );
    }

    #[allow(clippy::cast_precision_loss)]
    fn log_progress(&mut self, current: u64, total: Option<u64>) {
        self.last = current;
        if !self.throttle.admit(current, total) {
            return;
        }
        match total.filter(|t| *t > 0) {
            Some(total) => debug!(
                target: "marketkit.download",
                label = %self.label,
                current,
                total,
                percent = %format!("{:.1}", current as f64 / total as f64 * 100.0),
                "Download progress"
            ),
            None => debug!(
                target: "marketkit.download",
                label = %self.label,
                current,
                "Download progress"
            ),
        }
    }

    fn log_complete(&self) {
        debug!(
            target: "marketkit.download",
            label = %self.label,
            size = %format_bytes(self.last),
            "Download complete"
        );
    }

    fn log_error(&self, error: &MarketError) {
        warn!(
            target: "marketkit.download",
            label = %self.label,
            kind = %error.kind(),
            error = %error,
            "Download failed"
        );
    }
}

impl ProgressCallback for TracingProgress {
    fn on_start(&mut self, total: Option<u64>) {
        self.log_start(total);
    }

    fn on_progress(&mut self, current: u64, total: Option<u64>) {
        self.log_progress(current, total);
    }

    fn on_complete(&mut self) {
        self.log_complete();
    }

    fn on_error(&mut self, error: &MarketError) {
        self.log_error(error);
    }
}

#[async_trait]
impl AsyncProgressCallback for TracingProgress {
    async fn on_start(&mut self, total: Option<u64>) {
        self.log_start(total);
    }

    async fn on_progress(&mut self, current: u64, total: Option<u64>) {
        self.log_progress(current, total);
    }

    async fn on_complete(&mut self) {
        self.log_complete();
    }

    async fn on_error(&mut self, error: &MarketError) {
        self.log_error(error);
    }
}
