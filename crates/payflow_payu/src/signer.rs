//! PayU v4 request signing.
//!
//! Every outbound call is authenticated with
//!
//! ```text
//! bodyHash  = hex(md5(body))
//! message   = merchant + date + method + path + query + bodyHash
//! signature = hex(hmac_sha256(secret, message))
//! ```
//!
//! No separators are inserted between the parts. The date that goes into the
//! message must be sent byte-for-byte as `X-Header-Date`, which is why callers
//! should go through [`sign_request`] and build headers from the returned
//! [`SignedHeaders`] instead of generating the date twice.

use crate::error::PayuError;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use payflow_config::{mask_prefix, PayuConfig, SecretString};
use serde::Serialize;
use sha2::Sha256;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

type HmacSha256 = Hmac<Sha256>;

/// `X-Header-Date` format: UTC, seconds precision, literal `Z`.
pub const REQUEST_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub const HEADER_SIGNATURE: &str = "X-Header-Signature";
pub const HEADER_MERCHANT: &str = "X-Header-Merchant";
pub const HEADER_DATE: &str = "X-Header-Date";
pub const HEADER_IDEMPOTENCY_KEY: &str = "X-Header-Idempotency-Key";

/// Merchant code and secret key, the two inputs that identify us to PayU.
#[derive(Clone, Debug)]
pub struct PayuCredentials {
    pub merchant_code: String,
    pub secret_key: SecretString,
}

impl PayuCredentials {
    pub fn new(merchant_code: impl Into<String>, secret_key: SecretString) -> Self {
        Self {
            merchant_code: merchant_code.into(),
            secret_key,
        }
    }

    pub fn from_config(config: &PayuConfig) -> Self {
        Self::new(config.merchant_code.clone(), config.secret_key.clone())
    }

    pub fn masked_merchant(&self) -> String {
        mask_prefix(&self.merchant_code)
    }
}

/// Lowercase hex MD5 of the exact body bytes. Empty for bodiless requests.
pub fn body_hash(body: &str) -> String {
    format!("{:x}", md5::compute(body.as_bytes()))
}

/// The message that gets HMAC'd.
pub fn string_to_hash(
    merchant_code: &str,
    date: &str,
    method: &str,
    path: &str,
    query: &str,
    body_hash: &str,
) -> String {
    let mut message = String::with_capacity(
        merchant_code.len() + date.len() + method.len() + path.len() + query.len() + body_hash.len(),
    );
    message.push_str(merchant_code);
    message.push_str(date);
    message.push_str(method);
    message.push_str(path);
    message.push_str(query);
    message.push_str(body_hash);
    message
}

fn hmac_hex(secret_key: &str, message: &str) -> Result<String, PayuError> {
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|_| PayuError::InternalError("secret key rejected by HMAC".to_string()))?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Computes the `X-Header-Signature` value (64 lowercase hex chars).
///
/// Pure: the same inputs always give the same signature. `method` is used
/// as given, so callers pass the uppercase verb.
pub fn compute_signature(
    merchant_code: &str,
    secret_key: &str,
    date: &str,
    method: &str,
    path: &str,
    query: &str,
    body: &str,
) -> Result<String, PayuError> {
    let message = string_to_hash(merchant_code, date, method, path, query, &body_hash(body));
    hmac_hex(secret_key, &message)
}

/// Intermediate values of a signature, for the debug endpoint.
/// Contains nothing derived from the secret other than the signature itself.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SignatureBreakdown {
    pub body_hash: String,
    pub string_to_hash: String,
    pub signature: String,
}

pub fn debug_breakdown(
    merchant_code: &str,
    secret_key: &str,
    date: &str,
    method: &str,
    path: &str,
    query: &str,
    body: &str,
) -> Result<SignatureBreakdown, PayuError> {
    let body_hash = body_hash(body);
    let string_to_hash = string_to_hash(merchant_code, date, method, path, query, &body_hash);
    let signature = hmac_hex(secret_key, &string_to_hash)?;
    Ok(SignatureBreakdown {
        body_hash,
        string_to_hash,
        signature,
    })
}

pub fn format_request_date(at: DateTime<Utc>) -> String {
    at.format(REQUEST_DATE_FORMAT).to_string()
}

/// Current UTC time in the `X-Header-Date` format.
pub fn generate_request_date() -> String {
    format_request_date(Utc::now())
}

/// 128-bit random token as 32 lowercase hex chars. Used for merchant payment
/// references and idempotency keys.
pub fn generate_opaque_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Date and signature produced together for one outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub merchant: String,
    pub date: String,
    pub signature: String,
}

impl SignedHeaders {
    /// Authentication headers, plus the idempotency key for mutating calls.
    pub fn header_pairs(&self, idempotency_key: Option<&str>) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            (HEADER_SIGNATURE, self.signature.clone()),
            (HEADER_MERCHANT, self.merchant.clone()),
            (HEADER_DATE, self.date.clone()),
        ];
        if let Some(key) = idempotency_key {
            headers.push((HEADER_IDEMPOTENCY_KEY, key.to_string()));
        }
        headers
    }
}

/// Signs a request dated now.
pub fn sign_request(
    credentials: &PayuCredentials,
    method: &str,
    path: &str,
    query: &str,
    body: &str,
) -> Result<SignedHeaders, PayuError> {
    sign_request_at(credentials, Utc::now(), method, path, query, body)
}

/// Signs a request with an explicit timestamp.
pub fn sign_request_at(
    credentials: &PayuCredentials,
    at: DateTime<Utc>,
    method: &str,
    path: &str,
    query: &str,
    body: &str,
) -> Result<SignedHeaders, PayuError> {
    let date = format_request_date(at);
    let signature = compute_signature(
        &credentials.merchant_code,
        credentials.secret_key.expose(),
        &date,
        method,
        path,
        query,
        body,
    )?;
    Ok(SignedHeaders {
        merchant: credentials.merchant_code.clone(),
        date,
        signature,
    })
}
