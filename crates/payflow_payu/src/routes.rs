use crate::handlers::{
    authorize_handler, capture_handler, debug_credentials_handler, debug_signature_handler,
    refund_handler, return_handler, status_handler, wait_status_handler, PayuState,
};
use axum::{
    routing::{get, post},
    Router,
};
use payflow_config::AppConfig;
use std::sync::Arc;

/// Creates a router containing all routes for the PayU feature.
///
/// Routes are always mounted; when `use_payu` is off they answer 503.
pub fn routes(config: Arc<AppConfig>) -> Router {
    let payu_state = Arc::new(PayuState::new(config));

    Router::new()
        // Called by our frontend
        .route("/payu/authorize", post(authorize_handler))
        .route("/payu/capture", post(capture_handler))
        .route("/payu/refund", post(refund_handler))
        .route("/payu/status/{reference}", get(status_handler))
        .route("/payu/status/{reference}/wait", get(wait_status_handler))
        // Customer's browser returning from the hosted payment page
        .route("/payu/return", post(return_handler))
        // 404 unless payu.debug_endpoints is set
        .route("/payu/debug/credentials", get(debug_credentials_handler))
        .route("/payu/debug/signature", get(debug_signature_handler))
        .with_state(payu_state)
}
