use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ProviderConfig;
use crate::scoring::ChannelReport;

#[derive(Serialize)]
struct InsightRequest<'a> {
    report: &'a ChannelReport,
}

#[derive(Deserialize)]
struct InsightResponse {
    #[serde(default)]
    insights: Vec<String>,
}

/// An HTTP endpoint that turns a report into commentary.
#[derive(Debug, Clone)]
pub struct RemoteProvider {
    pub name: String,
    pub endpoint: String,
    /// Resolved when the chain is built; None when the variable is unset
    pub api_key: Option<String>,
    pub api_key_env: String,
    pub timeout: Duration,
}

impl RemoteProvider {
    pub fn from_config(name: &str, config: &ProviderConfig, timeout: Duration) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Self {
            name: name.to_string(),
            endpoint: config.endpoint.clone(),
            api_key,
            api_key_env: config.api_key_env.clone(),
            timeout,
        }
    }

    pub async fn generate(&self, client: &reqwest::Client, report: &ChannelReport) -> Result<Vec<String>> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("{} is not set", self.api_key_env))?;

        let response = client
            .post(&self.endpoint)
            .bearer_auth(key)
            .header("User-Agent", "channel-pulse")
            .timeout(self.timeout)
            .json(&InsightRequest { report })
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.endpoint))?
            .error_for_status()
            .with_context(|| format!("{} rejected the request", self.endpoint))?;

        let body: InsightResponse = response
            .json()
            .await
            .context("Failed to parse insights JSON")?;

        if body.insights.is_empty() {
            bail!("{} returned no insights", self.endpoint);
        }
        Ok(body.insights)
    }
}
