#![allow(dead_code)] // doc_* functions only carry utoipa attributes

#[cfg(feature = "openapi")]
use crate::debug::{CredentialsReport, MaskedCredentials, SampleRequest, SignatureReport};
#[cfg(feature = "openapi")]
use crate::models::{
    AuthorizationDetails, AuthorizeRequest, AuthorizeResponse, CaptureRequest, ClientDetails,
    PaymentState, PayuApiResponse, PayuAuthorizePayload, PayuCustomer, Product, RefundRequest,
    StatusWaitResponse,
};
#[cfg(feature = "openapi")]
use crate::signer::SignatureBreakdown;
#[cfg(feature = "openapi")]
use utoipa::OpenApi;

#[cfg(feature = "openapi")]
#[utoipa::path(
    post,
    path = "/api/payu/authorize",
    request_body = AuthorizeRequest,
    responses(
        (status = 200, description = "Payment authorized; send the customer to redirectUrl if present", body = AuthorizeResponse),
        (status = 400, description = "Invalid request"),
        (status = 502, description = "PayU rejected the request or could not be reached"),
        (status = 503, description = "PayU integration disabled")
    ),
    tag = "PayU"
)]
fn doc_authorize_handler() {}

#[cfg(feature = "openapi")]
#[utoipa::path(
    post,
    path = "/api/payu/capture",
    request_body = CaptureRequest,
    responses(
        (status = 200, description = "Capture accepted by PayU", body = PayuApiResponse),
        (status = 400, description = "Invalid amounts or reference"),
        (status = 502, description = "PayU rejected the request"),
        (status = 503, description = "PayU integration disabled")
    ),
    tag = "PayU"
)]
fn doc_capture_handler() {}

#[cfg(feature = "openapi")]
#[utoipa::path(
    post,
    path = "/api/payu/refund",
    request_body = RefundRequest,
    responses(
        (status = 200, description = "Refund accepted by PayU", body = PayuApiResponse),
        (status = 400, description = "Invalid amounts or reference"),
        (status = 502, description = "PayU rejected the request"),
        (status = 503, description = "PayU integration disabled")
    ),
    tag = "PayU"
)]
fn doc_refund_handler() {}

#[cfg(feature = "openapi")]
#[utoipa::path(
    get,
    path = "/api/payu/status/{reference}",
    params(("reference" = String, Path, description = "PayU payment reference")),
    responses(
        (status = 200, description = "Current status at PayU", body = PayuApiResponse),
        (status = 400, description = "Malformed reference"),
        (status = 502, description = "PayU rejected the request"),
        (status = 503, description = "PayU integration disabled")
    ),
    tag = "PayU"
)]
fn doc_status_handler() {}

#[cfg(feature = "openapi")]
#[utoipa::path(
    get,
    path = "/api/payu/status/{reference}/wait",
    params(("reference" = String, Path, description = "PayU payment reference")),
    responses(
        (status = 200, description = "Last observed status; completed=false if polling gave up", body = StatusWaitResponse),
        (status = 400, description = "Malformed reference"),
        (status = 502, description = "PayU rejected a status request"),
        (status = 503, description = "PayU integration disabled")
    ),
    tag = "PayU"
)]
fn doc_wait_status_handler() {}

#[cfg(feature = "openapi")]
#[utoipa::path(
    post,
    path = "/api/payu/return",
    request_body(content = String, content_type = "application/x-www-form-urlencoded", description = "PayU return callback, `body=<json>` or raw JSON"),
    responses(
        (status = 200, description = "HTML page redirecting to the frontend return page", content_type = "text/html"),
        (status = 503, description = "PayU integration disabled")
    ),
    tag = "PayU"
)]
fn doc_return_handler() {}

#[cfg(feature = "openapi")]
#[utoipa::path(
    get,
    path = "/api/payu/debug/credentials",
    responses(
        (status = 200, description = "Masked credential check", body = CredentialsReport),
        (status = 404, description = "Debug endpoints disabled")
    ),
    tag = "PayU Debug"
)]
fn doc_debug_credentials_handler() {}

#[cfg(feature = "openapi")]
#[utoipa::path(
    get,
    path = "/api/payu/debug/signature",
    responses(
        (status = 200, description = "Signature of a sample request, step by step", body = SignatureReport),
        (status = 404, description = "Debug endpoints disabled")
    ),
    tag = "PayU Debug"
)]
fn doc_debug_signature_handler() {}

#[cfg(feature = "openapi")]
#[derive(OpenApi)]
#[openapi(
    paths(
        doc_authorize_handler,
        doc_capture_handler,
        doc_refund_handler,
        doc_status_handler,
        doc_wait_status_handler,
        doc_return_handler,
        doc_debug_credentials_handler,
        doc_debug_signature_handler
    ),
    components(
        schemas(
            AuthorizeRequest, AuthorizeResponse, ClientDetails, Product, AuthorizationDetails,
            PayuCustomer, PayuAuthorizePayload, CaptureRequest, RefundRequest, PayuApiResponse,
            StatusWaitResponse, PaymentState, CredentialsReport, MaskedCredentials,
            SampleRequest, SignatureReport, SignatureBreakdown
        )
    ),
    tags(
        (name = "PayU", description = "PayU v4 payments: authorize, capture, refund, status"),
        (name = "PayU Debug", description = "Credential and signature diagnostics")
    )
)]
pub struct PayuApiDoc;
