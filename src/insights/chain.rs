use anyhow::{Context, Result};
use serde::Serialize;
use std::time::Duration;

use super::remote::RemoteProvider;
use super::static_provider::static_insights;
use super::{InsightsConfig, DEFAULT_TIMEOUT};
use crate::scoring::ChannelReport;

pub const STATIC_SOURCE: &str = "static";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    /// Name of the provider that answered
    pub source: String,
    pub items: Vec<String>,
}

/// Remote providers in the order they are tried. The static provider is not
/// in the list: it always runs last and cannot fail.
pub struct InsightChain {
    client: reqwest::Client,
    remotes: Vec<RemoteProvider>,
}

impl InsightChain {
    pub fn new(remotes: Vec<RemoteProvider>) -> Self {
        crate::install_crypto_provider();
        Self {
            client: reqwest::Client::new(),
            remotes,
        }
    }

    pub fn static_only() -> Self {
        Self::new(Vec::new())
    }

    pub fn from_config(config: &InsightsConfig) -> Result<Self> {
        let timeout_str = config.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT);
        let timeout: Duration = humantime::parse_duration(timeout_str)
            .with_context(|| format!("Invalid insights timeout '{}'", timeout_str))?;

        let remotes = [("primary", &config.primary), ("fallback", &config.fallback)]
            .into_iter()
            .filter_map(|(name, provider)| {
                provider
                    .as_ref()
                    .map(|p| RemoteProvider::from_config(name, p, timeout))
            })
            .collect();

        Ok(Self::new(remotes))
    }

    pub fn remotes(&self) -> &[RemoteProvider] {
        &self.remotes
    }

    /// First provider to answer wins. Failures are logged and the next
    /// provider is tried.
    pub async fn generate(&self, report: &ChannelReport) -> Insights {
        for provider in &self.remotes {
            match provider.generate(&self.client, report).await {
                Ok(items) => {
                    tracing::debug!(provider = %provider.name, count = items.len(), "Insights received");
                    return Insights {
                        source: provider.name.clone(),
                        items,
                    };
                }
                Err(e) => {
                    tracing::warn!(provider = %provider.name, "Insight provider failed: {:#}", e);
                }
            }
        }

        Insights {
            source: STATIC_SOURCE.to_string(),
            items: static_insights(report),
        }
    }
}
