use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
const DEFAULT_DEEPSEEK_MODEL: &str = "deepseek-chat";
const DEFAULT_USDA_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
const DEFAULT_UPSTREAM_TIMEOUT_SECONDS: u64 = 30;

/// Process-wide configuration, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct DietConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub deepseek: DeepSeekConfig,
    pub usda: UsdaConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct DeepSeekConfig {
    pub api_key: Secret<String>,
    /// Base URL without trailing slash, e.g. `https://api.deepseek.com`
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct UsdaConfig {
    pub api_key: Secret<String>,
    /// FoodData Central base URL, e.g. `https://api.nal.usda.gov/fdc/v1`
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub timeout: Duration,
}

impl DietConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let environment = match env::var("ENVIRONMENT").as_deref() {
            Ok("prod") => Environment::Prod,
            _ => Environment::Dev,
        };
        let is_prod = environment == Environment::Prod;

        let timeout = parse_timeout(&get_env(
            "UPSTREAM_TIMEOUT_SECONDS",
            Some(&DEFAULT_UPSTREAM_TIMEOUT_SECONDS.to_string()),
            is_prod,
        )?)?;

        Ok(DietConfig {
            common: common_config,
            environment,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            deepseek: DeepSeekConfig {
                // Empty keys are allowed outside prod; the upstream rejects the call.
                api_key: Secret::new(get_env("DEEPSEEK_API_KEY", Some(""), is_prod)?),
                base_url: trim_base_url(get_env(
                    "DEEPSEEK_BASE_URL",
                    Some(DEFAULT_DEEPSEEK_BASE_URL),
                    is_prod,
                )?),
                model: get_env("DEEPSEEK_MODEL", Some(DEFAULT_DEEPSEEK_MODEL), is_prod)?,
            },
            usda: UsdaConfig {
                api_key: Secret::new(get_env("USDA_API_KEY", Some(""), is_prod)?),
                base_url: trim_base_url(get_env(
                    "USDA_BASE_URL",
                    Some(DEFAULT_USDA_BASE_URL),
                    is_prod,
                )?),
            },
            upstream: UpstreamConfig {
                timeout,
            },
        })
    }
}

/// Whole seconds, at least one; zero would fail every outbound call.
fn parse_timeout(raw: &str) -> Result<Duration, AppError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(AppError::ConfigError(anyhow::anyhow!(
            "UPSTREAM_TIMEOUT_SECONDS must be at least 1"
        ))),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(AppError::ConfigError(anyhow::anyhow!(
            "UPSTREAM_TIMEOUT_SECONDS is invalid: {}",
            e
        ))),
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
