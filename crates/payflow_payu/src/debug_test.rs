#[cfg(test)]
mod tests {
    use crate::debug::{credentials_report, signature_report};
    use crate::signer::compute_signature;
    use chrono::{TimeZone, Utc};
    use payflow_config::{PayuConfig, SecretString};

    const SECRET: &str = "s3cr3t-key-for-tests-9876";

    fn config() -> PayuConfig {
        PayuConfig {
            merchant_code: "MERCHANT01".to_string(),
            secret_key: SecretString::new(SECRET),
            base_url: "https://sandbox.payu.test".to_string(),
            api_prefix: "/api/v4".to_string(),
            default_currency: None,
            return_page_url: "/payment/return".to_string(),
            return_url: None,
            request_timeout_secs: 30,
            debug_endpoints: true,
        }
    }

    #[test]
    fn test_credentials_report_is_masked() {
        let report = credentials_report(&config());
        assert_eq!(report.merchant_code, "MERC****");
        assert_eq!(report.secret_key, "****9876");
        assert_eq!(report.base_url, "https://sandbox.payu.test");
        assert!(report.has_all_credentials);

        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains(SECRET));
        assert!(json.contains("hasAllCredentials"));
    }

    #[test]
    fn test_credentials_report_flags_missing_secret() {
        let mut cfg = config();
        cfg.secret_key = SecretString::new("secret_from_env");
        let report = credentials_report(&cfg);
        assert_eq!(report.secret_key, "MISSING");
        assert!(!report.has_all_credentials);
    }

    #[test]
    fn test_signature_report_is_self_consistent() {
        let cfg = config();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let report = signature_report(&cfg, at).unwrap();

        assert_eq!(report.request.date, "2024-01-01T00:00:00Z");
        assert_eq!(report.request.path, "/api/v4/payments/authorize");
        assert_eq!(
            report.request.url,
            "https://sandbox.payu.test/api/v4/payments/authorize"
        );

        assert_eq!(report.request_body["currency"], "RUB");
        let expected = compute_signature(
            "MERCHANT01",
            SECRET,
            &report.request.date,
            "POST",
            &report.request.path,
            "",
            &report.request.body,
        )
        .unwrap();
        assert_eq!(report.signature.signature, expected);
        assert_eq!(report.headers["X-Header-Signature"], expected);
        assert_eq!(report.headers["X-Header-Date"], report.request.date);
        assert_eq!(
            report.headers["X-Header-Idempotency-Key"],
            report.request.idempotency_key
        );

        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains(SECRET));
    }
}
