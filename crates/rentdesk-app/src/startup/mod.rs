//! Application startup utilities module.
//!
//! Logging initialization and the window close handshake.

mod logging;
mod shutdown;

pub use logging::{LOG_FILE_NAME, LoggingConfig, LoggingGuard, init_logging};
pub use shutdown::{CloseCoordinator, CloseOutcome, DEFAULT_SAVE_TIMEOUT, SaveListener, SaveRequest};
