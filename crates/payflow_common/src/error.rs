// --- File: crates/payflow_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Payflow errors.
///
/// Provider crates keep their own error enums and implement
/// `From<ProviderError> for PayflowError` so handlers can turn any failure
/// into a uniform HTTP response.
#[derive(Error, Debug)]
pub enum PayflowError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Required configuration is missing or invalid
    #[error("Configuration missing: {0}")]
    ConfigError(String),

    /// The caller sent an invalid request
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// An upstream service answered with a non-success status
    #[error("{service_name} rejected the request with status {status_code}")]
    UpstreamRejected {
        service_name: String,
        status_code: u16,
        body: String,
    },

    /// The feature is disabled in configuration
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Error occurred due to a timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for PayflowError {
    fn status_code(&self) -> u16 {
        match self {
            PayflowError::HttpError(_) => 502,
            PayflowError::ParseError(_) => 502,
            PayflowError::ConfigError(_) => 500,
            PayflowError::ValidationError(_) => 400,
            PayflowError::UpstreamRejected { .. } => 502,
            PayflowError::ServiceUnavailable(_) => 503,
            PayflowError::TimeoutError(_) => 504,
            PayflowError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, PayflowError>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, PayflowError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| PayflowError::InternalError(format!("{}: {}", context, error)))
    }
}

// Common error conversions
impl From<reqwest::Error> for PayflowError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PayflowError::TimeoutError(err.to_string())
        } else {
            PayflowError::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PayflowError {
    fn from(err: serde_json::Error) -> Self {
        PayflowError::ParseError(err.to_string())
    }
}

impl From<payflow_config::ConfigValidationError> for PayflowError {
    fn from(err: payflow_config::ConfigValidationError) -> Self {
        PayflowError::ConfigError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> PayflowError {
    PayflowError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> PayflowError {
    PayflowError::ValidationError(message.to_string())
}

pub fn upstream_rejected(service_name: &str, status_code: u16, body: impl Into<String>) -> PayflowError {
    PayflowError::UpstreamRejected {
        service_name: service_name.to_string(),
        status_code,
        body: body.into(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> PayflowError {
    PayflowError::InternalError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(config_error("payu.secret_key").status_code(), 500);
        assert_eq!(validation_error("bad").status_code(), 400);
        assert_eq!(upstream_rejected("PayU", 401, "{}").status_code(), 502);
        assert_eq!(
            PayflowError::ServiceUnavailable("off".into()).status_code(),
            503
        );
        assert_eq!(internal_error("boom").status_code(), 500);
    }

    #[test]
    fn test_config_error_message_is_distinct() {
        let err = config_error("payu.secret_key");
        assert_eq!(err.to_string(), "Configuration missing: payu.secret_key");
    }

    #[test]
    fn test_context_wraps_error() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        let err = result.context("reading config").unwrap_err();
        assert_eq!(err.to_string(), "Internal error: reading config: no such file");
    }

    #[test]
    fn test_validation_error_converts() {
        let err: PayflowError = payflow_config::ConfigValidationError::Missing("payu").into();
        assert!(matches!(err, PayflowError::ConfigError(ref m) if m == "configuration missing: payu"));
    }
}
