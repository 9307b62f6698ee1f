//! Events emitted while a download runs.

mod progress;

pub use progress::ProgressEvent;
