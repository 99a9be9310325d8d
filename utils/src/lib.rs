//! Shared utilities for the fleet monitor.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat, LoggingError, DEFAULT_LEVEL};
pub use time::format_duration;
