//! Data models module
//!
//! - `config` - Configuration management and command line arguments
//! - `context` - Application context shared across handlers
//! - `response` - Operation result returned to the presentation layer

pub mod config;
pub mod context;
pub mod response;

pub use config::{Cli, Command, Configuration};
pub use context::AppContext;
pub use response::OperationResult;
