// Declare modules within this crate
pub mod callback;
#[cfg(test)]
mod callback_test;
pub mod client;
pub mod debug;
#[cfg(test)]
mod debug_test;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod models;
pub mod routes;
pub mod signer;
#[cfg(test)]
mod signer_proptest;

pub use client::PayuClient;
pub use error::PayuError;
pub use models::{AuthorizeRequest, CaptureRequest, PaymentState, RefundRequest};
pub use routes::routes;
pub use signer::{
    compute_signature, generate_opaque_token, generate_request_date, sign_request, PayuCredentials,
    SignedHeaders,
};
