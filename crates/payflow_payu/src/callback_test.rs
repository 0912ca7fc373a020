#[cfg(test)]
mod tests {
    use crate::callback::*;
    use crate::error::PayuError;

    const SUCCESS_JSON: &str = r#"{
        "payuPaymentReference": "PAYU-1",
        "merchantPaymentReference": "abc123",
        "status": "SUCCESS",
        "message": "Payment done",
        "paymentResult": { "payuResponseCode": "AUTHORIZED" }
    }"#;

    fn form(json: &str) -> String {
        serde_urlencoded::to_string(&[("body", json)]).unwrap()
    }

    #[test]
    fn test_parse_form_encoded_success() {
        let info = parse_callback(&form(SUCCESS_JSON)).unwrap();
        assert_eq!(info.payu_payment_reference.as_deref(), Some("PAYU-1"));
        assert_eq!(info.merchant_payment_reference.as_deref(), Some("abc123"));
        assert_eq!(info.status.as_deref(), Some("SUCCESS"));
        assert_eq!(info.message.as_deref(), Some("Payment done"));
        assert!(info.is_success);
    }

    #[test]
    fn test_parse_raw_json() {
        let info = parse_callback(SUCCESS_JSON).unwrap();
        assert!(info.is_success);
    }

    #[test]
    fn test_success_requires_authorized_response_code() {
        let json = r#"{"status":"SUCCESS","paymentResult":{"payuResponseCode":"PENDING"}}"#;
        assert!(!parse_callback(json).unwrap().is_success);

        let json = r#"{"status":"FAILED","paymentResult":{"payuResponseCode":"AUTHORIZED"}}"#;
        assert!(!parse_callback(json).unwrap().is_success);

        let json = r#"{"status":"SUCCESS"}"#;
        assert!(!parse_callback(json).unwrap().is_success);
    }

    #[test]
    fn test_extra_form_fields_are_ignored() {
        let raw = format!("{}&signature=xyz", form(r#"{"status":"SUCCESS"}"#));
        let info = parse_callback(&raw).unwrap();
        assert_eq!(info.status.as_deref(), Some("SUCCESS"));
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(parse_callback(""), Err(PayuError::InvalidCallback(_))));
        assert!(matches!(
            parse_callback("foo=bar"),
            Err(PayuError::InvalidCallback(_))
        ));
        assert!(matches!(
            parse_callback(&form("not json")),
            Err(PayuError::InvalidCallback(_))
        ));
        assert!(matches!(
            parse_callback(&form("[1,2]")),
            Err(PayuError::InvalidCallback(_))
        ));
    }

    #[test]
    fn test_redirect_url_carries_outcome() {
        let info = parse_callback(SUCCESS_JSON).unwrap();
        let url = redirect_url("/payment/return", &info);
        assert_eq!(
            url,
            "/payment/return?reference=abc123&status=SUCCESS&payuRef=PAYU-1&success=true&message=Payment+done"
        );
    }

    #[test]
    fn test_redirect_url_omits_missing_fields() {
        let info = CallbackInfo {
            status: Some("FAILED".to_string()),
            ..Default::default()
        };
        assert_eq!(
            redirect_url("/payment/return", &info),
            "/payment/return?status=FAILED"
        );
        assert_eq!(
            redirect_url("/payment/return", &CallbackInfo::default()),
            "/payment/return"
        );
    }

    #[test]
    fn test_redirect_url_appends_to_existing_query() {
        let info = CallbackInfo {
            status: Some("SUCCESS".to_string()),
            ..Default::default()
        };
        assert_eq!(
            redirect_url("https://shop.example.com/return?lang=ru", &info),
            "https://shop.example.com/return?lang=ru&status=SUCCESS"
        );
    }

    #[test]
    fn test_error_redirect_url() {
        assert_eq!(
            error_redirect_url("/payment/return"),
            "/payment/return?error=processing_failed"
        );
    }

    #[test]
    fn test_redirect_page_escapes_untrusted_values() {
        let info = CallbackInfo {
            message: Some("</script><script>alert(1)</script>".to_string()),
            ..Default::default()
        };
        let page = render_redirect_page(&info, &redirect_url("/payment/return", &info));
        assert!(!page.contains("<script>alert(1)"));
        assert!(page.contains("payuCallbackData"));
        assert!(page.contains("2000"));
    }

    #[test]
    fn test_redirect_page_targets_url() {
        let info = parse_callback(SUCCESS_JSON).unwrap();
        let target = redirect_url("/payment/return", &info);
        let page = render_redirect_page(&info, &target);
        assert!(page.contains("Payment successful"));
        assert!(page.contains("url=/payment/return?reference=abc123&amp;status=SUCCESS"));
        assert!(page.contains("\"/payment/return?reference=abc123\\u0026status=SUCCESS"));
    }

    #[test]
    fn test_error_page_targets_error_url() {
        let page = render_error_page(&error_redirect_url("/payment/return"));
        assert!(page.contains("Processing Error"));
        assert!(page.contains("error=processing_failed"));
    }
}
