use payflow_common::{
    config_error, internal_error, upstream_rejected, validation_error, HttpStatusCode,
    PayflowError,
};
use thiserror::Error;

/// PayU-specific error types.
#[derive(Error, Debug)]
pub enum PayuError {
    /// A required credential or config section is absent
    #[error("PayU configuration missing: {0}")]
    ConfigMissing(String),

    /// Transport failure talking to PayU
    #[error("PayU API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// PayU answered with a non-2xx status
    #[error("PayU rejected the request (status {status_code})")]
    GatewayRejected { status_code: u16, body: String },

    /// Error parsing a PayU response or our own payload
    #[error("Failed to parse PayU data: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The caller's request is unusable
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The return callback could not be decoded
    #[error("Invalid PayU callback: {0}")]
    InvalidCallback(String),

    /// `use_payu` is off or the section is absent
    #[error("PayU integration is disabled")]
    FeatureDisabled,

    /// Internal processing error
    #[error("Internal processing error: {0}")]
    InternalError(String),
}

impl From<PayuError> for PayflowError {
    fn from(err: PayuError) -> Self {
        match err {
            PayuError::ConfigMissing(what) => config_error(what),
            PayuError::RequestError(e) => PayflowError::from(e),
            PayuError::GatewayRejected { status_code, body } => {
                upstream_rejected("PayU", status_code, body)
            }
            PayuError::ParseError(e) => {
                PayflowError::ParseError(format!("PayU response parse error: {}", e))
            }
            PayuError::InvalidRequest(msg) => validation_error(msg),
            PayuError::InvalidCallback(msg) => {
                validation_error(format!("Invalid PayU callback: {}", msg))
            }
            PayuError::FeatureDisabled => {
                PayflowError::ServiceUnavailable("PayU integration is disabled".to_string())
            }
            PayuError::InternalError(msg) => internal_error(format!("PayU internal error: {}", msg)),
        }
    }
}

impl HttpStatusCode for PayuError {
    fn status_code(&self) -> u16 {
        match self {
            PayuError::ConfigMissing(_) => 500,
            PayuError::RequestError(e) if e.is_timeout() => 504,
            PayuError::RequestError(_) => 502,
            PayuError::GatewayRejected { .. } => 502,
            PayuError::ParseError(_) => 502,
            PayuError::InvalidRequest(_) => 400,
            PayuError::InvalidCallback(_) => 400,
            PayuError::FeatureDisabled => 503,
            PayuError::InternalError(_) => 500,
        }
    }
}
