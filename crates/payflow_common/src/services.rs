//! Service abstractions for external payment providers.
//!
//! Provider clients implement these traits so provider-agnostic code (status
//! polling, for now) can be written once and tested against fakes.

use serde::Serialize;
use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// One observation of a payment's state at the provider.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    /// The reference the status was requested for.
    pub reference: String,
    /// Provider status string, verbatim.
    pub status: Option<String>,
    /// No further transition is expected.
    pub terminal: bool,
    /// Terminal and the money moved (authorized or captured).
    pub successful: bool,
    /// The provider's full response body.
    pub raw: serde_json::Value,
}

/// A provider that can report the current status of a payment.
pub trait PaymentStatusSource: Send + Sync {
    /// Error type returned by status lookups.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the current status for `reference`. Must not retry internally.
    fn fetch_status<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, StatusSnapshot, Self::Error>;
}
