use anyhow::{bail, Result};
use log::{info, warn};
use secrecy::{ExposeSecret, Secret};
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Runtime settings, read once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Secret<String>,
    pub base_url: String,
    pub timeout: Duration,
    pub host: String,
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let api_key = Secret::new(env::var("OPENAI_API_KEY").unwrap_or_default());
        if api_key.expose_secret().trim().is_empty() {
            bail!("OPENAI_API_KEY is not set");
        }

        let settings = Self {
            api_key,
            base_url: env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(parse_or("OPENAI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080),
        };

        info!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("Ignoring invalid value for {}: {:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}
