//! Error types for the Parley domain.
//!
//! Each collaborator boundary has its own `thiserror` enum.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Failures while reading an attachment for a single request.
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8 text")]
    InvalidUtf8 { path: PathBuf },

    #[error("Failed to decode image {path}: {reason}")]
    InvalidImage { path: PathBuf, reason: String },

    #[error("File {path} is {size} bytes, limit is {limit} bytes")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("File type '{extension}' is not allowed")]
    DisallowedType { extension: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn attachment_error_displays_path() {
        let err = AttachmentError::TooLarge {
            path: PathBuf::from("/tmp/big.png"),
            size: 20,
            limit: 10,
        };
        let text = err.to_string();
        assert!(text.contains("/tmp/big.png"));
        assert!(text.contains("limit is 10"));
    }
}
