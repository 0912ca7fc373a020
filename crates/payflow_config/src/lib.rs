use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use once_cell::sync::OnceCell;
use std::env;
use tracing::debug;

pub mod env_vars;
pub mod models;
pub mod secret;

pub use env_vars::inject_env_vars;
pub use models::*;
pub use secret::{mask_prefix, mask_suffix, SecretString};

/// Loads the layered configuration for the current `RUN_ENV`.
///
/// Sources, later ones winning:
/// 1. `{config_dir}/default.*`
/// 2. `{config_dir}/{RUN_ENV}.*` (`RUN_ENV` defaults to `debug`)
/// 3. `PAYFLOW__SECTION__KEY` environment variables
///
/// `config_dir` is `PAYFLOW_CONFIG_DIR` or `config`. Afterwards every
/// `"secret_from_env"` marker is resolved, see [`env_vars::inject_env_vars`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let config_dir = env::var("PAYFLOW_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let prefix = env_vars::get_config_prefix();

    debug!(%run_env, %config_dir, "loading configuration");

    let builder = Config::builder()
        .add_source(File::with_name(&format!("{config_dir}/default")).required(false))
        .add_source(File::with_name(&format!("{config_dir}/{run_env}")).required(false))
        .add_source(Environment::with_prefix(&prefix).separator(env_vars::CONFIG_SEPARATOR));

    load_config_from(builder)
}

/// Builds `builder`, injects env secrets and deserializes into [`AppConfig`].
///
/// The injected tree is fed back through `config` so its string/number
/// coercion still applies (env values arrive as strings).
pub fn load_config_from(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig, ConfigError> {
    let mut raw: serde_json::Value = builder.build()?.try_deserialize()?;
    inject_env_vars(&mut raw);

    let json = serde_json::to_string(&raw)
        .map_err(|err| ConfigError::Message(format!("failed to re-encode configuration: {err}")))?;

    Config::builder()
        .add_source(File::from_str(&json, FileFormat::Json))
        .build()?
        .try_deserialize()
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment once.
///
/// The path is `DOTENV_OVERRIDE`, else the first CLI argument if it starts with
/// `.env`, else `.env`. A missing file is not an error. Returns the path used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_CONFIG: &str = r#"
        use_payu = true

        [server]
        host = "127.0.0.1"
        port = 8080

        [payu]
        merchant_code = "LOADTEST_MERCHANT"
        secret_key = "secret_from_env"
        base_url = "https://secure.payu.test"
    "#;

    #[test]
    fn test_load_config_from_toml_with_defaults() {
        let builder = Config::builder().add_source(File::from_str(BASE_CONFIG, FileFormat::Toml));
        let config = load_config_from(builder).expect("config should load");

        assert_eq!(config.server.port, 8080);
        assert!(config.use_payu);
        let payu = config.payu.expect("payu section");
        assert_eq!(payu.merchant_code, "LOADTEST_MERCHANT");
        assert_eq!(payu.api_prefix, "/api/v4");
        assert_eq!(payu.return_page_url, "/payment/return");
        assert_eq!(payu.request_timeout_secs, 30);
        assert!(!payu.debug_endpoints);
        assert_eq!(config.polling, PollingConfig::default());
    }

    #[test]
    fn test_unresolved_secret_fails_validation() {
        let builder = Config::builder().add_source(File::from_str(BASE_CONFIG, FileFormat::Toml));
        let config = load_config_from(builder).expect("config should load");
        if std::env::var("PAYU_SECRET_KEY").is_err()
            && std::env::var("PAYFLOW_SECRET_PAYU_SECRET_KEY").is_err()
        {
            assert_eq!(
                config.validate(),
                Err(ConfigValidationError::Missing("payu.secret_key"))
            );
        }
    }

    #[test]
    fn test_string_values_are_coerced() {
        let builder = Config::builder()
            .add_source(File::from_str(BASE_CONFIG, FileFormat::Toml))
            .set_override("server.port", "9090")
            .and_then(|b| b.set_override("polling.max_attempts", "3"))
            .and_then(|b| b.set_override("payu.merchant_code", 12345_i64))
            .expect("overrides");
        let config = load_config_from(builder).expect("config should load");

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.polling.max_attempts, 3);
        assert_eq!(config.payu.unwrap().merchant_code, "12345");
    }

    fn shipped_profile() -> ConfigBuilder<DefaultState> {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config");
        Config::builder()
            .add_source(File::from(dir.join("default.toml")))
            .add_source(File::from(dir.join("debug.toml")))
    }

    #[test]
    fn test_debug_profile_keeps_debug_endpoints_off() {
        let config = load_config_from(shipped_profile()).expect("shipped config should load");
        assert!(config.use_payu);
        assert!(!config.payu.expect("payu section").debug_endpoints);
    }

    #[test]
    fn test_debug_endpoints_need_explicit_opt_in() {
        let builder = shipped_profile()
            .set_override("payu.debug_endpoints", true)
            .expect("override");
        let config = load_config_from(builder).expect("config should load");
        assert!(config.payu.expect("payu section").debug_endpoints);
    }
}
