//! RentDesk App - Application context, operation handlers and CLI plumbing
//!
//! - [`model`]: configuration, the [`AppContext`](model::AppContext) and operation results
//! - [`handler`]: presentation-facing operations
//! - [`notification`]: lease-expiry reminders
//! - [`startup`]: logging and the close handshake

pub mod dialog;
pub mod handler;
pub mod model;
pub mod notification;
pub mod shell;
pub mod startup;
