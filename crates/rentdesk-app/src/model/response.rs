//! Operation result returned to the presentation layer

use rentdesk_common::{RentalError, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Outcome of one presentation-facing operation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
}

impl<T> OperationResult<T> {
    pub fn ok(data: T) -> Self {
        OperationResult {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    pub fn fail(error: &RentalError) -> Self {
        OperationResult {
            success: false,
            data: None,
            error: Some(error.to_string()),
            code: Some(error.error_code().code),
        }
    }

    /// Convert a pipeline result, logging the failure by kind
    ///
    /// Cancellations are logged at info. Io and template failures are logged
    /// at error with detail, everything else at warn.
    pub fn from_result(operation: &str, result: Result<T>) -> Self {
        match result {
            Ok(data) => OperationResult::ok(data),
            Err(e) => {
                if e.is_user_canceled() {
                    info!(operation = %operation, "{}", e);
                } else if e.is_diagnostic() {
                    error!(operation = %operation, error = ?e, "Operation failed");
                } else {
                    warn!(operation = %operation, error = %e, "Operation failed");
                }
                OperationResult::fail(&e)
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_serializes_without_error() {
        let result = OperationResult::ok("x.docx".to_string());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": "x.docx"}));
    }

    #[test]
    fn test_canceled_message() {
        let result: OperationResult<()> = OperationResult::from_result(
            "backup",
            Err(RentalError::UserCanceled("Backup".to_string())),
        );
        assert!(!result.is_success());
        assert_eq!(result.error.as_deref(), Some("Backup canceled by user."));
        assert_eq!(result.code, Some(10001));
    }

    #[test]
    fn test_from_ok_result() {
        let result = OperationResult::from_result("load-data", Ok(3));
        assert_eq!(result.data, Some(3));
        assert!(result.error.is_none());
    }
}
