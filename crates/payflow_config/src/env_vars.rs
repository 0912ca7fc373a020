//! Environment variable handling for the Payflow service.
//!
//! Configuration values use the `PAYFLOW__SECTION__KEY` pattern, secrets use
//! `PAYFLOW_SECRET_SECTION_KEY`. Both fall back to the short legacy names the
//! PayU integration has always been deployed with (`PAYU_SECRET_KEY`,
//! `PAYU_MERCHANT_CODE`, `PAYU_BASE_URL`).

use crate::secret::SECRET_FROM_ENV_MARKER;
use std::env;
use tracing::warn;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "PAYFLOW";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "PAYFLOW_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// `payu.base_url` becomes `PAYFLOW__PAYU__BASE_URL`.
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to an environment variable name
///
/// `payu.secret_key` becomes `PAYFLOW_SECRET_PAYU_SECRET_KEY`.
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a path to its legacy environment variable name
///
/// `payu.secret_key` becomes `PAYU_SECRET_KEY`.
pub fn legacy_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let service = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", service, key).to_uppercase()
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable for a configuration path, new naming first.
pub fn get_config_env_var(path: &str) -> Option<String> {
    non_empty_var(&config_path_to_env_var(path))
        .or_else(|| non_empty_var(&legacy_path_to_env_var(path)))
}

/// Get an environment variable for a secret path, new naming first.
pub fn get_secret_env_var(path: &str) -> Option<String> {
    non_empty_var(&secret_path_to_env_var(path))
        .or_else(|| non_empty_var(&legacy_path_to_env_var(path)))
}

/// Paths containing "secret", "key", "password" or "token" are secrets.
pub fn is_secret_path(path: &str) -> bool {
    let path_lower = path.to_lowercase();
    path_lower.contains("secret")
        || path_lower.contains("key")
        || path_lower.contains("password")
        || path_lower.contains("token")
}

/// Get an environment variable for a path, secret or not.
pub fn get_env_var(path: &str) -> Option<String> {
    if is_secret_path(path) {
        get_secret_env_var(path)
    } else {
        get_config_env_var(path)
    }
}

/// Replaces every `"secret_from_env"` string in `value` with the matching
/// environment variable. Returns `true` if anything was replaced.
///
/// Unresolved markers are left in place so validation can report them by path.
pub fn inject_env_vars(value: &mut serde_json::Value) -> bool {
    use serde_json::Value;

    fn walk(path: Vec<String>, obj: &mut Value) -> bool {
        let mut replaced = false;

        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    replaced |= walk(new_path, v);
                }
            }
            Value::Array(arr) => {
                for (i, v) in arr.iter_mut().enumerate() {
                    let mut new_path = path.clone();
                    new_path.push(i.to_string());
                    replaced |= walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_FROM_ENV_MARKER => {
                let path_str = path.join(".");
                if let Some(env_val) = get_env_var(&path_str) {
                    *s = env_val;
                    replaced = true;
                } else {
                    warn!(path = %path_str, "environment variable for configuration marker not found");
                }
            }
            _ => {}
        }

        replaced
    }

    walk(vec![], value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_path_to_env_var() {
        assert_eq!(
            config_path_to_env_var("server.host"),
            "PAYFLOW__SERVER__HOST"
        );
        assert_eq!(
            config_path_to_env_var("payu.base_url"),
            "PAYFLOW__PAYU__BASE_URL"
        );
    }

    #[test]
    fn test_secret_path_to_env_var() {
        assert_eq!(
            secret_path_to_env_var("payu.secret_key"),
            "PAYFLOW_SECRET_PAYU_SECRET_KEY"
        );
    }

    #[test]
    fn test_legacy_path_to_env_var() {
        assert_eq!(legacy_path_to_env_var("payu.secret_key"), "PAYU_SECRET_KEY");
        assert_eq!(
            legacy_path_to_env_var("payu.merchant_code"),
            "PAYU_MERCHANT_CODE"
        );
        assert_eq!(legacy_path_to_env_var("payu.base_url"), "PAYU_BASE_URL");
        assert_eq!(legacy_path_to_env_var("single"), "SINGLE");
    }

    #[test]
    fn test_is_secret_path() {
        assert!(is_secret_path("payu.secret_key"));
        assert!(is_secret_path("payu.api_token"));
        assert!(!is_secret_path("payu.merchant_code"));
        assert!(!is_secret_path("payu.base_url"));
        assert!(!is_secret_path("server.host"));
    }

    #[test]
    fn test_inject_env_vars_replaces_markers() {
        // Unique names so parallel tests cannot collide.
        env::set_var("INJECTTEST_SECRET_KEY", "s3cr3t-value");
        env::set_var("INJECTTEST_MERCHANT_CODE", "MERCHANT42");
        let mut value = json!({
            "injecttest": {
                "secret_key": "secret_from_env",
                "merchant_code": "secret_from_env",
                "base_url": "https://example.test"
            }
        });

        assert!(inject_env_vars(&mut value));
        assert_eq!(value["injecttest"]["secret_key"], "s3cr3t-value");
        assert_eq!(value["injecttest"]["merchant_code"], "MERCHANT42");
        assert_eq!(value["injecttest"]["base_url"], "https://example.test");
    }

    #[test]
    fn test_inject_env_vars_keeps_unresolved_marker() {
        let mut value = json!({ "nosuchservice": { "secret_key": "secret_from_env" } });
        assert!(!inject_env_vars(&mut value));
        assert_eq!(value["nosuchservice"]["secret_key"], SECRET_FROM_ENV_MARKER);
    }
}
