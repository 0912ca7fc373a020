use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Card payments through PayU's hosted page.
pub const DEFAULT_PAYMENT_METHOD: &str = "CCVISAMC";
pub const FALLBACK_CURRENCY: &str = "RUB";

// PayU expects product prices and quantities as strings; the frontend may send numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}

// --- Requests from our frontend ---

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ClientDetails {
    #[cfg_attr(feature = "openapi", schema(example = "Ivan"))]
    pub first_name: String,
    #[cfg_attr(feature = "openapi", schema(example = "Petrov"))]
    pub last_name: String,
    #[cfg_attr(feature = "openapi", schema(example = "ivan@example.com"))]
    pub email: String,
    #[cfg_attr(feature = "openapi", schema(example = "RU"))]
    pub country_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(example = "+7-9001234567"))]
    pub phone: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Product {
    #[cfg_attr(feature = "openapi", schema(example = "Consultation"))]
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(example = "SKU-001"))]
    pub sku: String,
    #[serde(deserialize_with = "string_or_number")]
    #[cfg_attr(feature = "openapi", schema(example = "1000.00"))]
    pub unit_price: String,
    #[serde(deserialize_with = "string_or_number")]
    #[cfg_attr(feature = "openapi", schema(example = "1"))]
    pub quantity: String,
}

/// Body of `POST /payu/authorize`.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuthorizeRequest {
    #[cfg_attr(feature = "openapi", schema(example = "CCVISAMC"))]
    pub payment_method: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "RUB"))]
    pub currency: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "https://shop.example.com/api/payu/return"))]
    pub return_url: Option<String>,
    pub client: ClientDetails,
    pub products: Vec<Product>,
}

// --- Payloads sent to PayU ---

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuthorizationDetails {
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_payment_page: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PayuCustomer {
    pub billing: ClientDetails,
}

/// JSON sent to `POST {prefix}/payments/authorize`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PayuAuthorizePayload {
    pub merchant_payment_reference: String,
    pub currency: String,
    pub return_url: String,
    pub authorization: AuthorizationDetails,
    pub client: PayuCustomer,
    pub products: Vec<Product>,
}

/// Body of `POST /payu/capture`, forwarded to PayU unchanged.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CaptureRequest {
    #[cfg_attr(feature = "openapi", schema(example = "PAYU-123456"))]
    pub payu_payment_reference: String,
    #[cfg_attr(feature = "openapi", schema(example = "RUB"))]
    pub currency: String,
    #[cfg_attr(feature = "openapi", schema(value_type = f64, example = 1000.0))]
    pub original_amount: serde_json::Number,
    #[cfg_attr(feature = "openapi", schema(value_type = f64, example = 1000.0))]
    pub amount: serde_json::Number,
}

/// Body of `POST /payu/refund`. Same shape as a capture.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RefundRequest {
    #[cfg_attr(feature = "openapi", schema(example = "PAYU-123456"))]
    pub payu_payment_reference: String,
    #[cfg_attr(feature = "openapi", schema(example = "RUB"))]
    pub currency: String,
    #[cfg_attr(feature = "openapi", schema(value_type = f64, example = 1000.0))]
    pub original_amount: serde_json::Number,
    #[cfg_attr(feature = "openapi", schema(value_type = f64, example = 250.0))]
    pub amount: serde_json::Number,
}

// --- PayU responses ---

/// A PayU response body. Kept as raw JSON since the schema differs per
/// endpoint and per payment method; the accessors cover the common fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayuResponse(pub Value);

impl PayuResponse {
    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn payu_payment_reference(&self) -> Option<&str> {
        self.str_field("payuPaymentReference")
    }

    pub fn status(&self) -> Option<&str> {
        self.str_field("status")
    }

    /// PayU's numeric result code; some endpoints send it as a string.
    pub fn code(&self) -> Option<i64> {
        match self.0.get("code")? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.str_field("message")
    }

    /// Hosted payment page the customer must be sent to, if any.
    pub fn redirect_url(&self) -> Option<&str> {
        self.0
            .get("paymentResult")
            .and_then(|r| r.get("url"))
            .and_then(Value::as_str)
    }

    /// The transaction status reported by the status endpoint, falling back
    /// to the top-level `status`.
    pub fn transaction_status(&self) -> Option<&str> {
        self.0
            .get("transactionStatus")
            .and_then(Value::as_str)
            .or_else(|| self.status())
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Where a payment stands according to a PayU status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum PaymentState {
    Pending,
    Authorized,
    Captured,
    Refunded,
    Failed,
    Cancelled,
}

impl PaymentState {
    /// Case-insensitive. Unknown statuses are treated as still in flight.
    pub fn from_status(status: &str) -> Self {
        match status.trim().to_ascii_uppercase().as_str() {
            "AUTHORIZED" => PaymentState::Authorized,
            "CAPTURED" => PaymentState::Captured,
            "REFUNDED" | "PARTIALLY_REFUNDED" => PaymentState::Refunded,
            "FAILED" | "DECLINED" | "ERROR" => PaymentState::Failed,
            "CANCELLED" | "CANCELED" | "REVERSED" | "EXPIRED" => PaymentState::Cancelled,
            _ => PaymentState::Pending,
        }
    }

    pub fn is_terminal(self) -> bool {
        self != PaymentState::Pending
    }

    pub fn is_success(self) -> bool {
        matches!(self, PaymentState::Authorized | PaymentState::Captured)
    }
}

// --- Responses to our frontend ---

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuthorizeResponse {
    pub success: bool,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub data: Value,
    pub merchant_payment_reference: String,
    /// `paymentResult.url`: the hosted page the customer must be sent to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

/// Envelope for capture, refund and status.
#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PayuApiResponse {
    pub success: bool,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub data: Value,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct StatusWaitResponse {
    pub success: bool,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub data: Value,
    pub attempts: u32,
    /// `false` when polling gave up before a terminal state.
    pub completed: bool,
    pub state: PaymentState,
}
