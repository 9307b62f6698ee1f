//! Download engines.
//!
//! Both engines follow the same sequence: resolve the target, check the
//! declared size, report `Start`, stream chunks into a staging file, verify
//! the byte count, sync, rename, report `Complete`. Any failure reports
//! `Error` and leaves no file behind.

mod blocking;
mod streaming;

pub use blocking::DownloadEngine;
pub use streaming::AsyncDownloadEngine;

use marketkit_core::utils::format_bytes;
use marketkit_core::{MarketError, MarketResult};

/// Byte accounting against the declared length and the configured limit.
#[derive(Debug, Clone, Copy)]
struct Limits {
    declared: Option<u64>,
    max: Option<u64>,
    written: u64,
}

impl Limits {
    const fn new(declared: Option<u64>, max: Option<u64>) -> Self {
        Self {
            declared,
            max,
            written: 0,
        }
    }

    fn check_declared(&self) -> MarketResult<()> {
        match (self.declared, self.max) {
            (Some(declared), Some(max)) if declared > max => Err(MarketError::validation(format!(
                "declared size {} exceeds limit of {}",
                format_bytes(declared),
                format_bytes(max)
            ))),
            _ => Ok(()),
        }
    }

    /// Account for `n` more bytes and return the new total.
    fn accept(&mut self, n: u64) -> MarketResult<u64> {
        let next = self.written.saturating_add(n);
        if let Some(declared) = self.declared {
            if next > declared {
                return Err(MarketError::network(format!(
                    "source exceeds declared length of {declared} bytes"
                )));
            }
        }
        if let Some(max) = self.max {
            if next > max {
                return Err(MarketError::validation(format!(
                    "download exceeds limit of {}",
                    format_bytes(max)
                )));
            }
        }
        self.written = next;
        Ok(next)
    }

    fn check_complete(&self) -> MarketResult<()> {
        match self.declared {
            Some(declared) if self.written < declared => Err(MarketError::network(format!(
                "source truncated: received {} of {declared} bytes",
                self.written
            ))),
            _ => Ok(()),
        }
    }

    const fn written(&self) -> u64 {
        self.written
    }
}
