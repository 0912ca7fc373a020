//! Signed HTTP client for the PayU v4 REST API.

use crate::error::PayuError;
use crate::models::{
    CaptureRequest, PaymentState, PayuAuthorizePayload, PayuResponse, RefundRequest,
};
use crate::signer::{sign_request, PayuCredentials};
use payflow_common::{create_client, BoxFuture, PaymentStatusSource, StatusSnapshot};
use payflow_config::PayuConfig;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

const JSON: &str = "application/json";

/// Rejects references that would alter the signed path.
pub fn validate_reference(reference: &str) -> Result<(), PayuError> {
    if reference.is_empty() || reference.len() > 128 {
        return Err(PayuError::InvalidRequest(
            "payment reference must be 1-128 characters".to_string(),
        ));
    }
    if !reference
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(PayuError::InvalidRequest(
            "payment reference may only contain letters, digits, '-' and '_'".to_string(),
        ));
    }
    Ok(())
}

/// Every request is signed with a fresh date; nothing is retried.
#[derive(Clone, Debug)]
pub struct PayuClient {
    config: PayuConfig,
    credentials: PayuCredentials,
    http: Client,
}

impl PayuClient {
    /// Validates the config and builds the underlying HTTP client.
    pub fn new(config: &PayuConfig) -> Result<Self, PayuError> {
        config
            .validate()
            .map_err(|e| PayuError::ConfigMissing(e.to_string()))?;
        let http = create_client(config.request_timeout_secs, false)?;
        Ok(Self::with_http_client(config, http))
    }

    /// Uses a caller-supplied HTTP client. The config is assumed valid.
    pub fn with_http_client(config: &PayuConfig, http: Client) -> Self {
        Self {
            config: config.clone(),
            credentials: PayuCredentials::from_config(config),
            http,
        }
    }

    pub fn credentials(&self) -> &PayuCredentials {
        &self.credentials
    }

    /// `POST {prefix}/payments/authorize`
    pub async fn authorize(
        &self,
        payload: &PayuAuthorizePayload,
        idempotency_key: &str,
    ) -> Result<PayuResponse, PayuError> {
        self.post_json("payments/authorize", payload, idempotency_key)
            .await
    }

    /// `POST {prefix}/payments/capture`
    pub async fn capture(
        &self,
        request: &CaptureRequest,
        idempotency_key: &str,
    ) -> Result<PayuResponse, PayuError> {
        self.post_json("payments/capture", request, idempotency_key)
            .await
    }

    /// `POST {prefix}/payments/refund`
    pub async fn refund(
        &self,
        request: &RefundRequest,
        idempotency_key: &str,
    ) -> Result<PayuResponse, PayuError> {
        self.post_json("payments/refund", request, idempotency_key)
            .await
    }

    /// `GET {prefix}/payments/status/{reference}`, signed over an empty body.
    pub async fn status(&self, reference: &str) -> Result<PayuResponse, PayuError> {
        validate_reference(reference)?;
        let endpoint = format!("payments/status/{}", reference);
        self.send(Method::GET, &endpoint, String::new(), None).await
    }

    async fn post_json<T: Serialize>(
        &self,
        endpoint: &str,
        payload: &T,
        idempotency_key: &str,
    ) -> Result<PayuResponse, PayuError> {
        // The signed bytes and the sent bytes must be the same string.
        let body = serde_json::to_string(payload)?;
        self.send(Method::POST, endpoint, body, Some(idempotency_key))
            .await
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: String,
        idempotency_key: Option<&str>,
    ) -> Result<PayuResponse, PayuError> {
        let path = self.config.api_path(endpoint);
        let url = self.config.url_for(&path);
        let signed = sign_request(&self.credentials, method.as_str(), &path, "", &body)?;

        debug!(
            %method,
            %path,
            date = %signed.date,
            signature = %signed.signature,
            "sending signed PayU request"
        );

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON);
        for (name, value) in signed.header_pairs(idempotency_key) {
            request = request.header(name, value);
        }
        if !body.is_empty() {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(%method, %path, status = status.as_u16(), "PayU rejected request");
            return Err(PayuError::GatewayRejected {
                status_code: status.as_u16(),
                body: text,
            });
        }

        info!(%method, %path, status = status.as_u16(), "PayU request succeeded");
        let value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };
        Ok(PayuResponse(value))
    }
}

/// Builds a polling snapshot from a status response.
pub fn snapshot_from_response(reference: &str, response: PayuResponse) -> StatusSnapshot {
    let status = response.transaction_status().map(str::to_string);
    let state = status
        .as_deref()
        .map(PaymentState::from_status)
        .unwrap_or(PaymentState::Pending);
    StatusSnapshot {
        reference: reference.to_string(),
        status,
        terminal: state.is_terminal(),
        successful: state.is_success(),
        raw: response.into_inner(),
    }
}

impl PaymentStatusSource for PayuClient {
    type Error = PayuError;

    fn fetch_status<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, StatusSnapshot, Self::Error> {
        Box::pin(async move {
            let response = self.status(reference).await?;
            Ok(snapshot_from_response(reference, response))
        })
    }
}
