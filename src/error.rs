// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for the prompttrace SDK.
//!
//! This module provides strongly-typed errors for each part of the pipeline,
//! using `thiserror` for ergonomic error definitions and `anyhow` for error
//! propagation in application-facing code.

use thiserror::Error;

/// Errors that can occur while sending an HTTP request through a [`Sender`].
///
/// These are the errors of the *instrumented* call itself. The interception
/// layer never swallows or rewrites them: a failed send propagates to the
/// caller exactly as the underlying sender produced it.
///
/// [`Sender`]: crate::intercept::Sender
#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("network error: {0}")]
    Network(String),
}

/// Errors that can occur while delivering a trace batch to the backend.
///
/// Uploads are fire-and-forget: these errors are logged and dropped by the
/// dispatcher, never surfaced to the instrumented caller.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("upload rejected with HTTP {status}")]
    Status { status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("serialization error: {0}")]
    Serialize(String),
}

impl UploadError {
    /// Get the HTTP status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            _ => None,
        }
    }
}

/// Errors that can occur calling the backend's request/response endpoints
/// (example-override lookup, hallucination check).
///
/// Unlike upload errors these *are* returned to the caller, since prompt
/// construction depends on the outcome.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("backend returned HTTP {status}")]
    Status { status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("response parsing error: {0}")]
    Parse(String),
}

impl BackendError {
    /// Check if this error is the missing-configuration case.
    pub fn is_missing_key(&self) -> bool {
        matches!(self, Self::MissingApiKey)
    }
}

/// Result type alias using anyhow for flexible error handling.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_error_status() {
        assert_eq!(UploadError::Status { status: 500 }.status(), Some(500));
        assert_eq!(UploadError::MissingApiKey.status(), None);
        assert_eq!(UploadError::Network("refused".to_string()).status(), None);
    }

    #[test]
    fn test_backend_error_missing_key() {
        assert!(BackendError::MissingApiKey.is_missing_key());
        assert!(!BackendError::Status { status: 404 }.is_missing_key());
    }

    #[test]
    fn test_error_display() {
        let err = UploadError::Status { status: 503 };
        assert!(format!("{}", err).contains("503"));

        let err = BackendError::Network("connection refused".to_string());
        assert!(format!("{}", err).contains("connection refused"));
    }
}
