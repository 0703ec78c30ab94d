//! Error types and error codes for the CMS
//!
//! This module defines:
//! - `CmsError`: Domain error enum carried inside `anyhow::Error`
//! - `ErrorCode`: Structured error codes for API responses

use serde::{Deserialize, Serialize};

/// Application-specific error types
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CmsError {
    #[error("{0}")]
    IllegalArgument(String),

    #[error("{0}")]
    ResourceNotFound(String),

    #[error("{0}")]
    ResourceConflict(String),

    #[error("{0}")]
    AuthError(String),

    #[error("{0}")]
    TooManyRequests(String),

    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl CmsError {
    /// Error code reported in the response envelope for this error.
    pub fn error_code(&self) -> ErrorCode<'static> {
        match self {
            CmsError::IllegalArgument(_) => PARAMETER_VALIDATE_ERROR,
            CmsError::ResourceNotFound(_) => RESOURCE_NOT_FOUND,
            CmsError::ResourceConflict(_) => RESOURCE_CONFLICT,
            CmsError::AuthError(_) => ACCESS_DENIED,
            CmsError::TooManyRequests(_) => TOO_MANY_REQUESTS,
            CmsError::DatabaseError(_) => DATA_ACCESS_ERROR,
            CmsError::InternalError(_) => SERVER_ERROR,
        }
    }
}

/// Error code structure for API responses
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

// General success and error codes
pub const SUCCESS: ErrorCode<'static> = ErrorCode {
    code: 0,
    message: "success",
};

pub const PARAMETER_MISSING: ErrorCode<'static> = ErrorCode {
    code: 10000,
    message: "parameter missing",
};

pub const ACCESS_DENIED: ErrorCode<'static> = ErrorCode {
    code: 10001,
    message: "access denied",
};

pub const DATA_ACCESS_ERROR: ErrorCode<'static> = ErrorCode {
    code: 10002,
    message: "data access error",
};

pub const TOO_MANY_REQUESTS: ErrorCode<'static> = ErrorCode {
    code: 10003,
    message: "too many requests",
};

// Parameter and resource errors
pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

pub const RESOURCE_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 20004,
    message: "resource not found",
};

pub const RESOURCE_CONFLICT: ErrorCode<'static> = ErrorCode {
    code: 20005,
    message: "resource conflict",
};

pub const UNSUPPORTED_LOCALE: ErrorCode<'static> = ErrorCode {
    code: 20006,
    message: "unsupported locale",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};

// Import/Export error codes
pub const IMPORT_DATA_INVALID: ErrorCode<'static> = ErrorCode {
    code: 100011,
    message: "import data must be a JSON object",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cms_error_display() {
        let err = CmsError::IllegalArgument("fullKey is required".to_string());
        assert_eq!(format!("{}", err), "fullKey is required");

        let err = CmsError::DatabaseError("connection refused".to_string());
        assert_eq!(format!("{}", err), "database error: connection refused");
    }

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            CmsError::ResourceConflict("dup".into()).error_code().code,
            RESOURCE_CONFLICT.code
        );
        assert_eq!(
            CmsError::AuthError("no".into()).error_code().code,
            ACCESS_DENIED.code
        );
        assert_eq!(
            CmsError::InternalError("x".into()).error_code().code,
            SERVER_ERROR.code
        );
    }

    #[test]
    fn test_cms_error_through_anyhow() {
        let err: anyhow::Error = CmsError::ResourceNotFound("missing".to_string()).into();
        assert_eq!(
            err.downcast_ref::<CmsError>(),
            Some(&CmsError::ResourceNotFound("missing".to_string()))
        );
        assert_eq!(err.to_string(), "missing");
    }
}
