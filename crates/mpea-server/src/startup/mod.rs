//! Application startup utilities

mod http;
mod logging;
mod shutdown;

pub use http::main_server;
pub use logging::{LogRotation, LoggingConfig, LoggingGuard, init_logging};
pub use shutdown::{ShutdownReason, ShutdownSignal, listen_for_os_signals};
