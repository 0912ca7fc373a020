use crate::client::{validate_reference, PayuClient};
use crate::error::PayuError;
use crate::models::{
    AuthorizationDetails, AuthorizeRequest, AuthorizeResponse, CaptureRequest, PaymentState,
    PayuApiResponse, PayuAuthorizePayload, PayuCustomer, RefundRequest, StatusWaitResponse,
    DEFAULT_PAYMENT_METHOD, FALLBACK_CURRENCY,
};
use crate::signer::generate_opaque_token;
use payflow_common::{poll_until_terminal, PollPolicy};
use payflow_config::PayuConfig;
use tracing::info;

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn require(value: &str, field: &str) -> Result<(), PayuError> {
    if value.trim().is_empty() {
        return Err(PayuError::InvalidRequest(format!("{} is required", field)));
    }
    Ok(())
}

/// Turns a frontend request into the PayU authorize payload.
///
/// Currency falls back to the configured default, then to RUB. The return URL
/// falls back to `payu.return_url`; with neither set the request is rejected.
pub fn build_authorize_payload(
    request: AuthorizeRequest,
    config: &PayuConfig,
    merchant_payment_reference: String,
) -> Result<PayuAuthorizePayload, PayuError> {
    let client = request.client;
    require(&client.first_name, "client.firstName")?;
    require(&client.last_name, "client.lastName")?;
    require(&client.email, "client.email")?;
    require(&client.country_code, "client.countryCode")?;

    if request.products.is_empty() {
        return Err(PayuError::InvalidRequest(
            "at least one product is required".to_string(),
        ));
    }
    for product in &request.products {
        require(&product.name, "products[].name")?;
        require(&product.unit_price, "products[].unitPrice")?;
        require(&product.quantity, "products[].quantity")?;
    }

    let currency = non_blank(request.currency.as_deref())
        .or_else(|| non_blank(config.default_currency.as_deref()))
        .unwrap_or(FALLBACK_CURRENCY)
        .to_string();

    let return_url = non_blank(request.return_url.as_deref())
        .or_else(|| non_blank(config.return_url.as_deref()))
        .ok_or_else(|| PayuError::InvalidRequest("returnUrl is required".to_string()))?
        .to_string();

    let payment_method = non_blank(request.payment_method.as_deref())
        .unwrap_or(DEFAULT_PAYMENT_METHOD)
        .to_string();
    // Only card payments go through PayU's hosted payment page.
    let use_payment_page = (payment_method == DEFAULT_PAYMENT_METHOD).then(|| "YES".to_string());

    Ok(PayuAuthorizePayload {
        merchant_payment_reference,
        currency,
        return_url,
        authorization: AuthorizationDetails {
            payment_method,
            use_payment_page,
        },
        client: PayuCustomer { billing: client },
        products: request.products,
    })
}

/// Checks a capture or refund before it is signed and sent.
pub fn validate_amounts(
    payu_payment_reference: &str,
    currency: &str,
    original_amount: &serde_json::Number,
    amount: &serde_json::Number,
) -> Result<(), PayuError> {
    require(payu_payment_reference, "payuPaymentReference")?;
    require(currency, "currency")?;

    let original = original_amount.as_f64().unwrap_or(f64::NAN);
    let amount = amount.as_f64().unwrap_or(f64::NAN);
    if amount.is_nan() || amount <= 0.0 {
        return Err(PayuError::InvalidRequest(
            "amount must be greater than zero".to_string(),
        ));
    }
    if original.is_nan() || amount > original {
        return Err(PayuError::InvalidRequest(
            "amount must not exceed originalAmount".to_string(),
        ));
    }
    Ok(())
}

pub async fn authorize_payment(
    client: &PayuClient,
    config: &PayuConfig,
    request: AuthorizeRequest,
) -> Result<AuthorizeResponse, PayuError> {
    let merchant_payment_reference = generate_opaque_token();
    let idempotency_key = generate_opaque_token();
    let payload = build_authorize_payload(request, config, merchant_payment_reference.clone())?;

    info!(
        merchant_payment_reference = %merchant_payment_reference,
        currency = %payload.currency,
        payment_method = %payload.authorization.payment_method,
        "authorizing PayU payment"
    );
    let response = client.authorize(&payload, &idempotency_key).await?;
    info!(
        merchant_payment_reference = %merchant_payment_reference,
        payu_payment_reference = ?response.payu_payment_reference(),
        status = ?response.status(),
        code = ?response.code(),
        message = ?response.message(),
        "PayU authorization accepted"
    );

    let redirect_url = response.redirect_url().map(str::to_string);
    Ok(AuthorizeResponse {
        success: true,
        data: response.into_inner(),
        merchant_payment_reference,
        redirect_url,
    })
}

pub async fn capture_payment(
    client: &PayuClient,
    request: CaptureRequest,
) -> Result<PayuApiResponse, PayuError> {
    validate_amounts(
        &request.payu_payment_reference,
        &request.currency,
        &request.original_amount,
        &request.amount,
    )?;
    info!(payu_payment_reference = %request.payu_payment_reference, "capturing PayU payment");
    let response = client.capture(&request, &generate_opaque_token()).await?;
    Ok(PayuApiResponse {
        success: true,
        data: response.into_inner(),
    })
}

pub async fn refund_payment(
    client: &PayuClient,
    request: RefundRequest,
) -> Result<PayuApiResponse, PayuError> {
    validate_amounts(
        &request.payu_payment_reference,
        &request.currency,
        &request.original_amount,
        &request.amount,
    )?;
    info!(payu_payment_reference = %request.payu_payment_reference, "refunding PayU payment");
    let response = client.refund(&request, &generate_opaque_token()).await?;
    Ok(PayuApiResponse {
        success: true,
        data: response.into_inner(),
    })
}

pub async fn payment_status(
    client: &PayuClient,
    reference: &str,
) -> Result<PayuApiResponse, PayuError> {
    let response = client.status(reference).await?;
    Ok(PayuApiResponse {
        success: true,
        data: response.into_inner(),
    })
}

/// Polls the status endpoint until the payment settles or `policy` runs out.
pub async fn wait_for_status(
    client: &PayuClient,
    reference: &str,
    policy: &PollPolicy,
) -> Result<StatusWaitResponse, PayuError> {
    // Fail before the first request rather than on every attempt.
    validate_reference(reference)?;
    let outcome = poll_until_terminal(client, reference, policy).await?;
    let state = outcome
        .snapshot
        .status
        .as_deref()
        .map(PaymentState::from_status)
        .unwrap_or(PaymentState::Pending);

    Ok(StatusWaitResponse {
        success: true,
        data: outcome.snapshot.raw,
        attempts: outcome.attempts,
        completed: outcome.completed,
        state,
    })
}
