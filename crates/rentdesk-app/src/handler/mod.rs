//! Presentation-facing operations
//!
//! Every handler takes the [`AppContext`](crate::model::AppContext), performs
//! one unit of work and reports the outcome as an
//! [`OperationResult`](crate::model::OperationResult). Failures never escape
//! as errors.

pub mod backup;
pub mod contract;
pub mod data;
pub mod document;
pub mod settings;
pub mod system;
