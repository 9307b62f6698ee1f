//! Progress events - discriminated union for the four-event protocol.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, MarketError};

/// One step of the progress protocol for a single download.
///
/// Within one invocation the order is: one `Start`, any number of `Progress`
/// with non-decreasing `current`, then exactly one of `Complete` or `Error`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Transfer is about to begin.
    Start {
        /// Declared length of the source, if known.
        #[serde(skip_serializing_if = "Option::is_none")]
        total: Option<u64>,
    },
    /// Bytes written so far.
    Progress {
        current: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        total: Option<u64>,
    },
    /// File is at its final path.
    Complete,
    /// Transfer failed.
    Error { kind: ErrorKind, message: String },
}

impl ProgressEvent {
    /// Build an `Error` event from a failure.
    pub fn error(cause: &MarketError) -> Self {
        Self::Error {
            kind: cause.kind(),
            message: cause.to_string(),
        }
    }

    /// Whether this event ends the invocation.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error { .. })
    }
}
