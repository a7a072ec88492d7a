//! OpenAI client configuration with sensible defaults.

use crate::config::OpenAISettings;
use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client for the given API key with the default timeout.
pub fn create_client(api_key: &str) -> Result<Client<OpenAIConfig>> {
    create_client_with(api_key, None, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an OpenAI client from the configured API settings.
pub fn create_client_from_settings(
    api_key: &str,
    settings: &OpenAISettings,
) -> Result<Client<OpenAIConfig>> {
    create_client_with(
        api_key,
        settings.api_base.as_deref(),
        Duration::from_secs(settings.timeout_seconds),
    )
}

/// Create an OpenAI client with a custom base URL and timeout.
pub fn create_client_with(
    api_key: &str,
    api_base: Option<&str>,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    let mut config = OpenAIConfig::new().with_api_key(api_key);
    if let Some(base) = api_base {
        config = config.with_api_base(base);
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}
