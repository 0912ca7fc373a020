//! Diagnostics for credential and signature problems.
//!
//! Only mounted when `payu.debug_endpoints` is set. Nothing here is sent to
//! PayU, and the secret key only ever appears as a masked preview.

use crate::error::PayuError;
use crate::models::{
    AuthorizationDetails, ClientDetails, PayuAuthorizePayload, PayuCustomer, Product,
    DEFAULT_PAYMENT_METHOD,
};
use crate::signer::{
    debug_breakdown, format_request_date, generate_opaque_token, PayuCredentials,
    SignatureBreakdown, SignedHeaders,
};
use chrono::{DateTime, Utc};
use payflow_config::PayuConfig;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MaskedCredentials {
    pub merchant_code: String,
    pub secret_key: String,
    pub base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CredentialsReport {
    pub merchant_code: String,
    pub secret_key: String,
    pub base_url: String,
    pub has_all_credentials: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SampleRequest {
    pub method: String,
    pub path: String,
    pub url: String,
    pub date: String,
    pub idempotency_key: String,
    /// The exact bytes that were hashed.
    pub body: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SignatureReport {
    pub config: MaskedCredentials,
    pub request: SampleRequest,
    pub signature: SignatureBreakdown,
    pub headers: BTreeMap<String, String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub request_body: Value,
}

fn masked(config: &PayuConfig) -> MaskedCredentials {
    let credentials = PayuCredentials::from_config(config);
    MaskedCredentials {
        merchant_code: credentials.masked_merchant(),
        secret_key: credentials.secret_key.masked_preview(),
        base_url: config.base_url.clone(),
    }
}

pub fn credentials_report(config: &PayuConfig) -> CredentialsReport {
    let MaskedCredentials {
        merchant_code,
        secret_key,
        base_url,
    } = masked(config);
    CredentialsReport {
        merchant_code,
        secret_key,
        base_url,
        has_all_credentials: config.validate().is_ok(),
    }
}

fn sample_payload() -> PayuAuthorizePayload {
    PayuAuthorizePayload {
        merchant_payment_reference: format!("TEST_{}", generate_opaque_token()),
        currency: "RUB".to_string(),
        return_url: "https://example.com/return".to_string(),
        authorization: AuthorizationDetails {
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
            use_payment_page: Some("YES".to_string()),
        },
        client: PayuCustomer {
            billing: ClientDetails {
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: "test@example.com".to_string(),
                country_code: "RU".to_string(),
                phone: Some("+7-1234567890".to_string()),
            },
        },
        products: vec![Product {
            name: "Test Product".to_string(),
            sku: "TEST001".to_string(),
            unit_price: "100.00".to_string(),
            quantity: "1".to_string(),
        }],
    }
}

/// Signs a sample authorize request as of `at` and reports every step.
pub fn signature_report(
    config: &PayuConfig,
    at: DateTime<Utc>,
) -> Result<SignatureReport, PayuError> {
    let method = "POST";
    let path = config.api_path("payments/authorize");
    let date = format_request_date(at);
    let idempotency_key = generate_opaque_token();
    let payload = sample_payload();
    let body = serde_json::to_string(&payload)?;
    let request_body = serde_json::to_value(&payload)?;

    let breakdown = debug_breakdown(
        &config.merchant_code,
        config.secret_key.expose(),
        &date,
        method,
        &path,
        "",
        &body,
    )?;

    let signed = SignedHeaders {
        merchant: config.merchant_code.clone(),
        date: date.clone(),
        signature: breakdown.signature.clone(),
    };
    let mut headers: BTreeMap<String, String> = signed
        .header_pairs(Some(&idempotency_key))
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers.insert("Content-Type".to_string(), "application/json".to_string());

    Ok(SignatureReport {
        config: masked(config),
        request: SampleRequest {
            method: method.to_string(),
            url: config.url_for(&path),
            path,
            date,
            idempotency_key,
            body,
        },
        signature: breakdown,
        headers,
        request_body,
    })
}
