//! Browser return from PayU's hosted payment page.
//!
//! PayU posts the outcome back to our return URL, usually form-encoded with a
//! single `body` field holding JSON. We extract the references and status,
//! then render a small page that forwards the browser to the frontend's
//! return page after two seconds. The callback's signature is not verified.

use crate::error::PayuError;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Query value appended when the callback could not be decoded.
pub const PROCESSING_FAILED: &str = "processing_failed";

const REDIRECT_DELAY_MS: u64 = 2_000;

/// The parts of a return callback the frontend cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackInfo {
    pub payu_payment_reference: Option<String>,
    pub merchant_payment_reference: Option<String>,
    pub status: Option<String>,
    pub message: Option<String>,
    pub is_success: bool,
}

impl CallbackInfo {
    pub fn from_json(value: &Value) -> Self {
        let field = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        let status = field("status");
        let response_code = value
            .get("paymentResult")
            .and_then(|r| r.get("payuResponseCode"))
            .and_then(Value::as_str);

        Self {
            payu_payment_reference: field("payuPaymentReference"),
            merchant_payment_reference: field("merchantPaymentReference"),
            is_success: status.as_deref() == Some("SUCCESS") && response_code == Some("AUTHORIZED"),
            status,
            message: field("message"),
        }
    }
}

/// Decodes a callback body, either raw JSON or form-encoded with `body=<json>`.
pub fn parse_callback(raw: &str) -> Result<CallbackInfo, PayuError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PayuError::InvalidCallback("empty body".to_string()));
    }

    let json = if trimmed.starts_with('{') {
        trimmed.to_string()
    } else {
        let mut fields: HashMap<String, String> = serde_urlencoded::from_str(trimmed)
            .map_err(|e| PayuError::InvalidCallback(format!("form decoding failed: {}", e)))?;
        fields
            .remove("body")
            .ok_or_else(|| PayuError::InvalidCallback("missing 'body' field".to_string()))?
    };

    let value: Value = serde_json::from_str(&json)
        .map_err(|e| PayuError::InvalidCallback(format!("body is not JSON: {}", e)))?;
    if !value.is_object() {
        return Err(PayuError::InvalidCallback(
            "body is not a JSON object".to_string(),
        ));
    }
    Ok(CallbackInfo::from_json(&value))
}

fn with_query(base: &str, pairs: &[(&str, &str)]) -> String {
    if pairs.is_empty() {
        return base.to_string();
    }
    // Encoding a list of string pairs cannot fail.
    let query = serde_urlencoded::to_string(pairs).unwrap_or_default();
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}", base, separator, query)
}

/// Return-page URL carrying the callback outcome as query parameters.
pub fn redirect_url(return_page_url: &str, info: &CallbackInfo) -> String {
    let mut pairs: Vec<(&str, &str)> = Vec::new();
    if let Some(reference) = info.merchant_payment_reference.as_deref() {
        pairs.push(("reference", reference));
    }
    if let Some(status) = info.status.as_deref() {
        pairs.push(("status", status));
    }
    if let Some(payu_ref) = info.payu_payment_reference.as_deref() {
        pairs.push(("payuRef", payu_ref));
    }
    if info.is_success {
        pairs.push(("success", "true"));
    }
    if let Some(message) = info.message.as_deref() {
        pairs.push(("message", message));
    }
    with_query(return_page_url, &pairs)
}

pub fn error_redirect_url(return_page_url: &str) -> String {
    with_query(return_page_url, &[("error", PROCESSING_FAILED)])
}

fn html_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// JSON string literal that is also safe inside a <script> element.
fn script_string(value: &str) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// Page shown while the browser is forwarded to the return page.
///
/// The callback summary is also stored in `localStorage` under
/// `payuCallbackData` so the return page can show it without re-querying.
pub fn render_redirect_page(info: &CallbackInfo, target: &str) -> String {
    let (class, headline) = if info.is_success {
        ("success", "Payment successful")
    } else {
        ("pending", "Processing...")
    };
    let callback_json = serde_json::to_string(info).unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta http-equiv="refresh" content="{delay_secs};url={target_attr}">
    <title>Payment Processing</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; display: flex; justify-content: center; align-items: center; min-height: 100vh; margin: 0; background-color: #f5f5f5; }}
        .container {{ text-align: center; background: white; padding: 2rem; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); max-width: 400px; }}
        .success {{ color: #27ae60; }}
        .pending {{ color: #7f8c8d; }}
    </style>
</head>
<body>
    <div class="container">
        <h2>Processing Payment</h2>
        <p class="{class}">{headline}</p>
        <p>Redirecting...</p>
    </div>
    <script>
        try {{
            localStorage.setItem('payuCallbackData', {callback_js});
            localStorage.setItem('payuCallbackTimestamp', Date.now().toString());
        }} catch (e) {{}}
        setTimeout(function () {{ window.location.href = {target_js}; }}, {delay_ms});
    </script>
</body>
</html>"#,
        delay_secs = REDIRECT_DELAY_MS / 1000,
        delay_ms = REDIRECT_DELAY_MS,
        target_attr = html_escape(target),
        target_js = script_string(target),
        callback_js = script_string(&callback_json),
        class = class,
        headline = headline,
    )
}

/// Page shown when the callback could not be decoded.
pub fn render_error_page(target: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta http-equiv="refresh" content="{delay_secs};url={target_attr}">
    <title>Payment Error</title>
</head>
<body>
    <div style="text-align: center; padding: 2rem;">
        <h2>Processing Error</h2>
        <p>Redirecting to payment status...</p>
    </div>
    <script>
        setTimeout(function () {{ window.location.href = {target_js}; }}, {delay_ms});
    </script>
</body>
</html>"#,
        delay_secs = REDIRECT_DELAY_MS / 1000,
        delay_ms = REDIRECT_DELAY_MS,
        target_attr = html_escape(target),
        target_js = script_string(target),
    )
}
