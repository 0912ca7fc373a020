//! Feature flag handling for the Payflow service.
//!
//! Features are switched in two places:
//!
//! 1. Compile-time cargo features (`payu`, `openapi`) on the backend crate
//! 2. Runtime `use_*` flags in [`AppConfig`]
//!
//! A provider is only live when its runtime flag is set AND its config
//! section is present.

use payflow_config::AppConfig;

/// `true` when the runtime flag is set and the section is configured.
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

/// Check if the PayU integration is enabled at runtime.
#[cfg(feature = "payu")]
pub fn is_payu_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_payu, config.payu.as_ref())
}

/// Names of the runtime features that are currently live, for startup logging.
pub fn enabled_features(config: &AppConfig) -> Vec<&'static str> {
    let mut features = Vec::new();
    if is_feature_enabled(config.use_payu, config.payu.as_ref()) {
        features.push("payu");
    }
    features
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_feature_enabled_requires_both() {
        assert!(is_feature_enabled(true, Some(&())));
        assert!(!is_feature_enabled(true, None::<&()>));
        assert!(!is_feature_enabled(false, Some(&())));
    }
}
