//! Commentary on a scored report.
//!
//! Providers are tried in a fixed order: the configured primary endpoint,
//! then the fallback endpoint, then the built-in static provider, which
//! always answers.

pub mod chain;
pub mod remote;
pub mod static_provider;

pub use chain::{InsightChain, Insights};
pub use remote::RemoteProvider;
pub use static_provider::static_insights;

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_KEY_ENV: &str = "CHANNEL_PULSE_API_KEY";
pub const DEFAULT_TIMEOUT: &str = "15s";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InsightsConfig {
    pub primary: Option<ProviderConfig>,
    pub fallback: Option<ProviderConfig>,
    /// Per-request timeout, e.g. "10s" or "1m"
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    pub endpoint: String,
    /// Environment variable holding the bearer token for this endpoint
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

/// Validate insight provider settings at startup.
pub fn validate_insights(config: &InsightsConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (name, provider) in [("primary", &config.primary), ("fallback", &config.fallback)] {
        if let Some(provider) = provider {
            if !provider.endpoint.starts_with("http://") && !provider.endpoint.starts_with("https://") {
                errors.push(format!(
                    "insights.{}.endpoint: must be an http(s) URL, got '{}'",
                    name, provider.endpoint
                ));
            }
            if provider.api_key_env.trim().is_empty() {
                errors.push(format!("insights.{}.api_key_env: must not be empty", name));
            }
        }
    }

    if let Some(ref timeout) = config.timeout {
        if let Err(e) = humantime::parse_duration(timeout) {
            errors.push(format!("insights.timeout: invalid format '{}' - {}", timeout, e));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
