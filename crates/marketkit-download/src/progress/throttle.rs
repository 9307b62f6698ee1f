//! Progress log throttling.
//!
//! A line is admitted when the interval has elapsed, when the byte step has
//! been crossed, or when the transfer reaches its declared total. The first
//! update after [`ProgressThrottle::restart`] is always admitted.

use std::time::{Duration, Instant};

/// Decides which progress updates are worth a log line.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    interval: Duration,
    byte_step: Option<u64>,
    last_at: Option<Instant>,
    last_bytes: u64,
}

impl ProgressThrottle {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            byte_step: None,
            last_at: None,
            last_bytes: 0,
        }
    }

    /// Also admit an update once `step` bytes arrived since the last one.
    #[must_use]
    pub const fn with_byte_step(mut self, step: u64) -> Self {
        self.byte_step = Some(step);
        self
    }

    /// Whether `current` should be logged. Admitted updates become the new
    /// reference point.
    pub fn admit(&mut self, current: u64, total: Option<u64>) -> bool {
        let now = Instant::now();
        let due = match self.last_at {
            None => true,
            Some(last) => {
                now.duration_since(last) >= self.interval
                    || total.is_some_and(|t| current >= t)
                    || self
                        .byte_step
                        .is_some_and(|step| current.saturating_sub(self.last_bytes) >= step)
            }
        };
        if due {
            self.last_at = Some(now);
            self.last_bytes = current;
        }
        due
    }

    /// Forget the previous transfer.
    pub const fn restart(&mut self) {
        self.last_at = None;
        self.last_bytes = 0;
    }
}

impl Default for ProgressThrottle {
    /// At most one line per 250ms, plus the final one.
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}
