//! Progress reporting: protocol drivers, log-backed callback, throttling.

mod driver;
mod log;
mod throttle;

pub use driver::{AsyncProgressDriver, ProgressDriver};
pub use log::TracingProgress;
pub use throttle::ProgressThrottle;
