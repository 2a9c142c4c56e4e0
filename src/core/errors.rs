//! Custom error types for translation operations

use thiserror::Error;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// API rejected the request
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code returned by the endpoint
        status: u16,
        /// Response body or error description
        message: String,
    },

    /// Network error
    #[error("Network error: {message}")]
    NetworkError {
        /// Underlying transport failure
        message: String,
    },

    /// Invalid response from API
    #[error("Invalid response: {message}")]
    InvalidResponseError {
        /// What was missing or malformed
        message: String,
    },

    /// Request timeout
    #[error("Request timeout")]
    TimeoutError,

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Which setting is wrong
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl TranslationError {
    /// Whether another attempt could succeed.
    ///
    /// Auth failures, missing models and rejected payloads are permanent;
    /// transport problems, throttling, server faults and unparseable
    /// replies are treated as transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::NetworkError { .. }
            | TranslationError::TimeoutError
            | TranslationError::InvalidResponseError { .. }
            | TranslationError::JsonError(_) => true,
            TranslationError::ApiError { status, .. } => {
                matches!(status, 408 | 409 | 429) || *status >= 500
            }
            TranslationError::ConfigError { .. } | TranslationError::IoError(_) => false,
        }
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TranslationError::TimeoutError
        } else if err.is_decode() {
            TranslationError::InvalidResponseError {
                message: err.to_string(),
            }
        } else if err.is_builder() {
            TranslationError::ConfigError {
                message: err.to_string(),
            }
        } else {
            TranslationError::NetworkError {
                message: err.to_string(),
            }
        }
    }
}

impl From<config::ConfigError> for TranslationError {
    fn from(err: config::ConfigError) -> Self {
        TranslationError::ConfigError {
            message: err.to_string(),
        }
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> TranslationError {
        TranslationError::ApiError {
            status,
            message: "x".to_string(),
        }
    }

    #[test]
    fn test_permanent_api_errors() {
        for status in [400, 401, 403, 404, 422] {
            assert!(!api(status).is_retryable(), "status {status}");
        }
    }

    #[test]
    fn test_transient_errors() {
        for status in [408, 409, 429, 500, 502, 503] {
            assert!(api(status).is_retryable(), "status {status}");
        }
        assert!(TranslationError::TimeoutError.is_retryable());
        assert!(TranslationError::NetworkError {
            message: "reset".to_string()
        }
        .is_retryable());
        assert!(TranslationError::InvalidResponseError {
            message: "no text".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_config_error_not_retryable() {
        let err = TranslationError::ConfigError {
            message: "API key is required".to_string(),
        };
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Configuration error: API key is required");
    }
}
