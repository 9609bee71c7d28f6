//! Logging infrastructure for console output.

mod subscriber;

pub use subscriber::{LOG_ENV, init_subscriber};
