//! Error types and error codes for RentDesk
//!
//! This module defines:
//! - `RentalError`: Application-specific error enum shared by every crate
//! - `AppError`: Wrapper around `anyhow::Error` for startup and CLI plumbing
//! - `ErrorCode`: Structured error codes reported back to the presentation layer

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum RentalError {
    #[error("{0} canceled by user.")]
    UserCanceled(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("tenant '{0}' has no contract template")]
    NoTemplate(String),

    #[error("template error: {0}")]
    TemplateError(String),

    #[error("io error: {0}")]
    IoError(String),
}

impl RentalError {
    /// Error code reported alongside the message
    pub fn error_code(&self) -> ErrorCode<'static> {
        match self {
            RentalError::UserCanceled(_) => USER_CANCELED,
            RentalError::NotFound(_) => RESOURCE_NOT_FOUND,
            RentalError::InvalidFormat(_) => INVALID_FORMAT,
            RentalError::NoTemplate(_) => NO_TEMPLATE,
            RentalError::TemplateError(_) => TEMPLATE_RENDER_ERROR,
            RentalError::IoError(_) => IO_ERROR,
        }
    }

    /// Dismissed dialogs are a normal outcome and must never be logged as errors
    pub fn is_user_canceled(&self) -> bool {
        matches!(self, RentalError::UserCanceled(_))
    }

    /// Whether the failure should be logged with detail for diagnostics
    pub fn is_diagnostic(&self) -> bool {
        matches!(
            self,
            RentalError::IoError(_) | RentalError::TemplateError(_)
        )
    }
}

impl From<std::io::Error> for RentalError {
    fn from(value: std::io::Error) -> Self {
        RentalError::IoError(value.to_string())
    }
}

/// Result alias used across the RentDesk crates
pub type Result<T> = std::result::Result<T, RentalError>;

/// Wrapper for application errors
#[derive(Debug)]
pub struct AppError {
    inner: anyhow::Error,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError { inner: value }
    }
}

impl From<RentalError> for AppError {
    fn from(value: RentalError) -> Self {
        AppError {
            inner: anyhow::Error::new(value),
        }
    }
}

impl AppError {
    pub fn downcast_ref<E: std::error::Error + Send + Sync + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }
}

/// Error code structure for operation results
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

pub const USER_CANCELED: ErrorCode<'static> = ErrorCode {
    code: 10001,
    message: "operation canceled by user",
};

pub const RESOURCE_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 20004,
    message: "resource not found",
};

pub const INVALID_FORMAT: ErrorCode<'static> = ErrorCode {
    code: 20010,
    message: "invalid file format",
};

pub const NO_TEMPLATE: ErrorCode<'static> = ErrorCode {
    code: 20011,
    message: "no contract template designated",
};

pub const TEMPLATE_RENDER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20012,
    message: "contract template render error",
};

pub const IO_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "file system error",
};
