// Shared building blocks for the Payflow crates: the common error type and
// its HTTP mapping, the outbound HTTP client, logging setup, feature gating
// and provider-agnostic status polling.

pub mod error;
pub mod features;
pub mod handlers;
pub mod http;
pub mod logging;
pub mod polling;
pub mod routes;
pub mod services;

// Re-export the routes function to be used by the main backend service
pub use routes::routes;

pub use error::{
    config_error, internal_error, upstream_rejected, validation_error,
    Context, HttpStatusCode, PayflowError,
};

pub use http::{
    client::create_client,
    map_json_error, IntoHttpResponse,
};

pub use logging::{init, init_with_level, log_error};

pub use features::{enabled_features, is_feature_enabled};

#[cfg(feature = "payu")]
pub use features::is_payu_enabled;

pub use polling::{poll_until_terminal, PollOutcome, PollPolicy};
pub use services::{BoxFuture, PaymentStatusSource, StatusSnapshot};
