use crate::callback::{
    error_redirect_url, parse_callback, redirect_url, render_error_page, render_redirect_page,
};
use crate::client::PayuClient;
use crate::debug::{credentials_report, signature_report, CredentialsReport, SignatureReport};
use crate::error::PayuError;
use crate::logic::{
    authorize_payment, capture_payment, payment_status, refund_payment, wait_for_status,
};
use crate::models::{
    AuthorizeRequest, AuthorizeResponse, CaptureRequest, PayuApiResponse, RefundRequest,
    StatusWaitResponse,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use payflow_common::{is_payu_enabled, map_json_error, PayflowError, PollPolicy};
use payflow_config::{AppConfig, PayuConfig};
use std::sync::Arc;
use tracing::{error, info, warn};

const NO_STORE: &str = "no-cache, no-store, must-revalidate";

// Shared state for the PayU handlers
pub struct PayuState {
    pub config: Arc<AppConfig>,
    /// `None` when the integration is disabled or its config is unusable.
    pub client: Option<PayuClient>,
    pub poll_policy: PollPolicy,
}

impl PayuState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let client = if is_payu_enabled(&config) {
            config.payu.as_ref().and_then(|payu| match PayuClient::new(payu) {
                Ok(client) => Some(client),
                Err(e) => {
                    error!("PayU client could not be created: {}", e);
                    None
                }
            })
        } else {
            None
        };
        let poll_policy = PollPolicy::from(&config.polling);
        Self {
            config,
            client,
            poll_policy,
        }
    }

    fn client(&self) -> Result<&PayuClient, PayuError> {
        self.client.as_ref().ok_or(PayuError::FeatureDisabled)
    }

    fn payu_config(&self) -> Result<&PayuConfig, PayuError> {
        if !is_payu_enabled(&self.config) {
            return Err(PayuError::FeatureDisabled);
        }
        self.config.payu.as_ref().ok_or(PayuError::FeatureDisabled)
    }

    // Debug routes pretend not to exist unless switched on.
    fn debug_config(&self) -> Result<&PayuConfig, Response> {
        let payu = self
            .payu_config()
            .map_err(|e| PayflowError::from(e).into_response())?;
        if !payu.debug_endpoints {
            return Err(StatusCode::NOT_FOUND.into_response());
        }
        Ok(payu)
    }
}

/// `POST /payu/authorize`
#[axum::debug_handler]
pub async fn authorize_handler(
    State(state): State<Arc<PayuState>>,
    payload: Result<Json<AuthorizeRequest>, JsonRejection>,
) -> Result<Json<AuthorizeResponse>, PayflowError> {
    let client = state.client()?;
    let config = state.payu_config()?;
    let Json(request) = payload?;
    let response = authorize_payment(client, config, request).await?;
    Ok(Json(response))
}

/// `POST /payu/capture`
#[axum::debug_handler]
pub async fn capture_handler(
    State(state): State<Arc<PayuState>>,
    payload: Result<Json<CaptureRequest>, JsonRejection>,
) -> Result<Json<PayuApiResponse>, PayflowError> {
    let client = state.client()?;
    let Json(request) = payload?;
    Ok(Json(capture_payment(client, request).await?))
}

/// `POST /payu/refund`
#[axum::debug_handler]
pub async fn refund_handler(
    State(state): State<Arc<PayuState>>,
    payload: Result<Json<RefundRequest>, JsonRejection>,
) -> Result<Json<PayuApiResponse>, PayflowError> {
    let client = state.client()?;
    let Json(request) = payload?;
    Ok(Json(refund_payment(client, request).await?))
}

/// `GET /payu/status/{reference}`
#[axum::debug_handler]
pub async fn status_handler(
    State(state): State<Arc<PayuState>>,
    Path(reference): Path<String>,
) -> Result<Json<PayuApiResponse>, PayflowError> {
    let client = state.client()?;
    Ok(Json(payment_status(client, &reference).await?))
}

/// `GET /payu/status/{reference}/wait`
#[axum::debug_handler]
pub async fn wait_status_handler(
    State(state): State<Arc<PayuState>>,
    Path(reference): Path<String>,
) -> Result<Json<StatusWaitResponse>, PayflowError> {
    let client = state.client()?;
    let response = wait_for_status(client, &reference, &state.poll_policy).await?;
    Ok(Json(response))
}

/// `POST /payu/return`, hit by the customer's browser coming back from PayU.
///
/// Always answers with an HTML page; decoding failures send the browser to
/// the return page with `error=processing_failed`.
#[axum::debug_handler]
pub async fn return_handler(State(state): State<Arc<PayuState>>, body: String) -> Response {
    let payu = match state.payu_config() {
        Ok(payu) => payu,
        Err(e) => return PayflowError::from(e).into_response(),
    };

    let html = match parse_callback(&body) {
        Ok(info) => {
            info!(
                merchant_payment_reference = ?info.merchant_payment_reference,
                payu_payment_reference = ?info.payu_payment_reference,
                status = ?info.status,
                success = info.is_success,
                "PayU return callback received"
            );
            render_redirect_page(&info, &redirect_url(&payu.return_page_url, &info))
        }
        Err(e) => {
            warn!("PayU return callback could not be processed: {}", e);
            render_error_page(&error_redirect_url(&payu.return_page_url))
        }
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, NO_STORE),
        ],
        html,
    )
        .into_response()
}

/// `GET /payu/debug/credentials`
#[axum::debug_handler]
pub async fn debug_credentials_handler(
    State(state): State<Arc<PayuState>>,
) -> Result<Json<CredentialsReport>, Response> {
    let payu = state.debug_config()?;
    let report = credentials_report(payu);
    info!(
        merchant_code = %report.merchant_code,
        secret_key = %report.secret_key,
        has_all_credentials = report.has_all_credentials,
        "PayU credentials check"
    );
    Ok(Json(report))
}

/// `GET /payu/debug/signature`
#[axum::debug_handler]
pub async fn debug_signature_handler(
    State(state): State<Arc<PayuState>>,
) -> Result<Json<SignatureReport>, Response> {
    let payu = state.debug_config()?;
    map_json_error(signature_report(payu, Utc::now()), PayflowError::from)
}
