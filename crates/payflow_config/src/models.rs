// --- File: crates/payflow_config/src/models.rs ---

use crate::secret::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised at startup when required settings are absent or malformed.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("configuration missing: {0}")]
    Missing(&'static str),
    #[error("invalid configuration value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory with the browser UI, served as the fallback service.
    #[serde(default)]
    pub static_dir: Option<String>,
}

// --- PayU Config ---
// merchant_code, secret_key and base_url are usually "secret_from_env" in the
// config file and resolved from PAYU_MERCHANT_CODE / PAYU_SECRET_KEY / PAYU_BASE_URL.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PayuConfig {
    pub merchant_code: String,
    pub secret_key: SecretString,
    pub base_url: String,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    pub default_currency: Option<String>,
    /// Browser page the return callback redirects to.
    #[serde(default = "default_return_page_url")]
    pub return_page_url: String,
    /// `returnUrl` sent to PayU when the frontend does not supply one.
    pub return_url: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub debug_endpoints: bool,
}

fn default_api_prefix() -> String {
    "/api/v4".to_string()
}

fn default_return_page_url() -> String {
    "/payment/return".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl PayuConfig {
    /// Checks that every credential resolved. Never includes secret values in the error.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if is_unresolved(&self.merchant_code) {
            return Err(ConfigValidationError::Missing("payu.merchant_code"));
        }
        if self.secret_key.is_unresolved() {
            return Err(ConfigValidationError::Missing("payu.secret_key"));
        }
        if is_unresolved(&self.base_url) {
            return Err(ConfigValidationError::Missing("payu.base_url"));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ConfigValidationError::Invalid {
                field: "payu.base_url",
                reason: "must be an absolute http(s) URL".to_string(),
            });
        }
        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            return Err(ConfigValidationError::Invalid {
                field: "payu.api_prefix",
                reason: "must start with '/'".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigValidationError::Invalid {
                field: "payu.request_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Path as signed and sent, e.g. `/api/v4/payments/authorize`.
    pub fn api_path(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.api_prefix.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Absolute URL for an already prefixed path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn is_unresolved(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == crate::secret::SECRET_FROM_ENV_MARKER
}

// --- Status Polling Config ---
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PollingConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    10
}

fn default_initial_delay_ms() -> u64 {
    1_000
}

fn default_backoff_factor() -> f64 {
    1.5
}

fn default_max_delay_ms() -> u64 {
    10_000
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            backoff_factor: default_backoff_factor(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_payu: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub payu: Option<PayuConfig>,
    #[serde(default)]
    pub polling: PollingConfig,
}

impl AppConfig {
    /// Fail-fast check run before the server binds.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.use_payu {
            return Ok(());
        }
        match self.payu.as_ref() {
            Some(payu) => payu.validate(),
            None => Err(ConfigValidationError::Missing("payu")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payu_config() -> PayuConfig {
        PayuConfig {
            merchant_code: "TESTMERCHANT".to_string(),
            secret_key: SecretString::new("testsecret"),
            base_url: "https://secure.payu.test".to_string(),
            api_prefix: default_api_prefix(),
            default_currency: None,
            return_page_url: default_return_page_url(),
            return_url: None,
            request_timeout_secs: 30,
            debug_endpoints: false,
        }
    }

    fn app_config(use_payu: bool, payu: Option<PayuConfig>) -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                static_dir: None,
            },
            use_payu,
            payu,
            polling: PollingConfig::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert_eq!(payu_config().validate(), Ok(()));
        assert_eq!(app_config(true, Some(payu_config())).validate(), Ok(()));
    }

    #[test]
    fn test_missing_secret_is_reported_by_path() {
        let mut cfg = payu_config();
        cfg.secret_key = SecretString::new("secret_from_env");
        assert_eq!(
            cfg.validate(),
            Err(ConfigValidationError::Missing("payu.secret_key"))
        );
    }

    #[test]
    fn test_missing_merchant_and_base_url() {
        let mut cfg = payu_config();
        cfg.merchant_code = String::new();
        assert_eq!(
            cfg.validate(),
            Err(ConfigValidationError::Missing("payu.merchant_code"))
        );

        let mut cfg = payu_config();
        cfg.base_url = "secret_from_env".to_string();
        assert_eq!(
            cfg.validate(),
            Err(ConfigValidationError::Missing("payu.base_url"))
        );
    }

    #[test]
    fn test_invalid_base_url_scheme() {
        let mut cfg = payu_config();
        cfg.base_url = "ftp://secure.payu.test".to_string();
        assert!(matches!(
            cfg.validate(),
            Err(ConfigValidationError::Invalid { field: "payu.base_url", .. })
        ));
    }

    #[test]
    fn test_enabled_without_section_fails() {
        assert_eq!(
            app_config(true, None).validate(),
            Err(ConfigValidationError::Missing("payu"))
        );
        assert_eq!(app_config(false, None).validate(), Ok(()));
    }

    #[test]
    fn test_api_path_and_url_joining() {
        let mut cfg = payu_config();
        assert_eq!(
            cfg.api_path("payments/authorize"),
            "/api/v4/payments/authorize"
        );
        cfg.api_prefix = "/api/v4/".to_string();
        cfg.base_url = "https://secure.payu.test/".to_string();
        let path = cfg.api_path("/payments/status/abc");
        assert_eq!(path, "/api/v4/payments/status/abc");
        assert_eq!(
            cfg.url_for(&path),
            "https://secure.payu.test/api/v4/payments/status/abc"
        );
    }

    #[test]
    fn test_serialized_config_masks_secret() {
        let json = serde_json::to_string(&payu_config()).unwrap();
        assert!(!json.contains("testsecret"));
        assert!(json.contains("\"secret_key\":\"****cret\""));
    }
}
