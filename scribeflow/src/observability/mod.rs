//! Logging setup and timing helpers.

mod logging;
mod spans;

pub use logging::{init_logging, LogConfig, LogFormat};
pub use spans::SpanTimer;
