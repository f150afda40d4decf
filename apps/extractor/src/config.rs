use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::extraction::view_model::InitialLoad;
use crate::llm_client::DEFAULT_API_URL;

/// Where the gateway sends extraction requests.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendConfig {
    /// Call the Anthropic API directly.
    Anthropic { api_key: String, api_url: String },
    /// Forward to another instance of this server over HTTP.
    Remote { base_url: String },
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    pub port: u16,
    pub rust_log: String,
    pub extraction_timeout: Duration,
    pub initial_load: InitialLoad,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        // A remote origin makes the Anthropic key unnecessary on this side.
        let backend = match lookup("EXTRACTION_REMOTE_URL") {
            Some(base_url) => BackendConfig::Remote { base_url },
            None => BackendConfig::Anthropic {
                api_key: require("ANTHROPIC_API_KEY")?,
                api_url: lookup("ANTHROPIC_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            },
        };

        let timeout_secs = lookup("EXTRACTION_TIMEOUT_SECS")
            .unwrap_or_else(|| "60".to_string())
            .parse::<u64>()
            .context("EXTRACTION_TIMEOUT_SECS must be a whole number of seconds")?;
        if timeout_secs == 0 {
            return Err(anyhow!("EXTRACTION_TIMEOUT_SECS must be greater than zero"));
        }

        Ok(Config {
            backend,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            extraction_timeout: Duration::from_secs(timeout_secs),
            initial_load: lookup("INITIAL_LOAD")
                .map(|v| v.parse::<InitialLoad>())
                .transpose()
                .map_err(|e| anyhow!(e))?
                .unwrap_or_default(),
        })
    }
}
