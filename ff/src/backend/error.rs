//! Backend error types

use std::time::Duration;
use thiserror::Error;

/// Errors a decomposition backend can report
///
/// None of these are fatal to the caller: every variant routes the journal
/// entry to the local engine.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError {
    /// Short label for logs and notices
    pub fn kind(&self) -> &'static str {
        match self {
            BackendError::Unavailable(_) => "unavailable",
            BackendError::Timeout(_) => "timeout",
            BackendError::Service(_) => "service error",
            BackendError::Malformed(_) | BackendError::Json(_) => "malformed response",
            BackendError::Io(_) => "io error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(BackendError::Timeout(Duration::from_secs(3)).kind(), "timeout");
        assert_eq!(BackendError::Malformed("x".to_string()).kind(), "malformed response");
        let json_err = serde_json::from_str::<Vec<u32>>("nope").unwrap_err();
        assert_eq!(BackendError::from(json_err).kind(), "malformed response");
    }

    #[test]
    fn test_display() {
        let err = BackendError::Service("exit code 2".to_string());
        assert_eq!(err.to_string(), "Service error: exit code 2");
    }
}
