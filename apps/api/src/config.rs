use std::str::FromStr;

use anyhow::{Context, Result};

use crate::budget::{BudgetThresholds, ExchangeRates};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub llm_timeout_secs: u64,
    pub default_user_country: String,
    pub budget_thresholds: BudgetThresholds,
    pub exchange_rates: ExchangeRates,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let thresholds = BudgetThresholds::default();
        let rates = ExchangeRates::default();

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: std::env::var("GEMINI_AI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            gemini_api_base: std::env::var("GEMINI_API_BASE").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }),
            llm_timeout_secs: env_or("LLM_TIMEOUT_SECS", 120)?,
            default_user_country: std::env::var("DEFAULT_USER_COUNTRY")
                .unwrap_or_else(|_| "Indonesia".to_string()),
            budget_thresholds: BudgetThresholds {
                monthly_medium_min: env_or(
                    "BUDGET_MONTHLY_MEDIUM_MIN",
                    thresholds.monthly_medium_min,
                )?,
                monthly_high_min: env_or("BUDGET_MONTHLY_HIGH_MIN", thresholds.monthly_high_min)?,
                total_medium_min: env_or("BUDGET_TOTAL_MEDIUM_MIN", thresholds.total_medium_min)?,
                total_high_min: env_or("BUDGET_TOTAL_HIGH_MIN", thresholds.total_high_min)?,
            },
            exchange_rates: ExchangeRates {
                idr_per_usd: env_or("IDR_PER_USD", rates.idr_per_usd)?,
                idr_per_eur: env_or("IDR_PER_EUR", rates.idr_per_eur)?,
                idr_per_gbp: env_or("IDR_PER_GBP", rates.idr_per_gbp)?,
                idr_per_aud: env_or("IDR_PER_AUD", rates.idr_per_aud)?,
            },
            port: env_or("PORT", 5000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an optional variable, falling back to `default` when unset.
/// A value that is set but unparseable is a startup error.
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration used by handler and service tests. No network access happens
    /// because tests swap in a scripted completion gateway.
    pub fn for_tests() -> Self {
        Config {
            gemini_api_key: "test-key".to_string(),
            gemini_model: "gemini-test".to_string(),
            gemini_api_base: "http://127.0.0.1:9".to_string(),
            llm_timeout_secs: 5,
            default_user_country: "Indonesia".to_string(),
            budget_thresholds: BudgetThresholds::default(),
            exchange_rates: ExchangeRates::default(),
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
