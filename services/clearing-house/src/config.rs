use crate::retry::RetryConfig;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub call_timeout_ms: u64,
    /// bank name -> base URL of its service
    pub banks: HashMap<String, String>,
    pub retry: RetrySettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl From<RetrySettings> for RetryConfig {
    fn from(settings: RetrySettings) -> Self {
        RetryConfig {
            max_retries: settings.max_retries,
            initial_delay_ms: settings.initial_delay_ms,
            max_delay_ms: settings.max_delay_ms,
            ..RetryConfig::default()
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv::dotenv().ok();

        let port = env::var("SERVICE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let call_timeout_ms = env::var("BANK_CALL_TIMEOUT_MS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(3000);

        // Static registry, e.g. {"gcash": "http://localhost:8000", ...}
        let banks = match env::var("BANK_REGISTRY") {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(_) => HashMap::from([
                ("gcash".to_string(), "http://localhost:8000".to_string()),
                ("bpi".to_string(), "http://localhost:8001".to_string()),
            ]),
        };

        Ok(Config {
            port,
            call_timeout_ms,
            banks,
            retry: RetrySettings {
                max_retries: 3,
                initial_delay_ms: 200,
                max_delay_ms: 3000,
            },
        })
    }
}
