use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

use crate::analytics::{AnalyticsReport, LoyaltyRow, RetentionRow, TrafficRow, VideoSummary};

/// Everything the engine scores, as exported from the Data and Analytics
/// APIs. Every section is optional; missing sections score as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnapshot {
    pub channel: Option<String>,
    /// Most recent first, as the Data API's search endpoint returns them
    pub videos: Vec<VideoSummary>,
    pub traffic_sources: AnalyticsReport<TrafficRow>,
    pub search_terms: AnalyticsReport<TrafficRow>,
    pub loyalty: AnalyticsReport<LoyaltyRow>,
    pub retention: AnalyticsReport<RetentionRow>,
}

/// Snapshot with every section left as raw JSON, decoded one section at a
/// time so errors can say where they happened.
#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct RawSnapshot {
    channel: Option<String>,
    videos: Vec<Value>,
    traffic_sources: Option<Value>,
    search_terms: Option<Value>,
    loyalty: Option<Value>,
    retention: Option<Value>,
}

impl ChannelSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawSnapshot =
            serde_json::from_str(json).context("Failed to parse snapshot: invalid JSON")?;

        let videos = raw
            .videos
            .into_iter()
            .enumerate()
            .map(|(i, video)| {
                serde_json::from_value(video).with_context(|| format!("Invalid video at videos[{}]", i))
            })
            .collect::<Result<Vec<VideoSummary>>>()?;

        Ok(Self {
            channel: raw.channel,
            videos,
            traffic_sources: section("trafficSources", raw.traffic_sources)?,
            search_terms: section("searchTerms", raw.search_terms)?,
            loyalty: section("loyalty", raw.loyalty)?,
            retention: section("retention", raw.retention)?,
        })
    }
}

fn section<R: DeserializeOwned>(name: &str, value: Option<Value>) -> Result<AnalyticsReport<R>> {
    match value {
        None => Ok(AnalyticsReport::default()),
        Some(value) => serde_json::from_value(value)
            .with_context(|| format!("Invalid {} section", name)),
    }
}

/// Load a snapshot from a JSON file, or from stdin when `path` is `-`.
pub fn load_snapshot(path: &Path) -> Result<ChannelSnapshot> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read snapshot from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot at {}", path.display()))?
    };

    let snapshot = ChannelSnapshot::from_json(&content)
        .with_context(|| format!("Invalid snapshot {}", path.display()))?;

    tracing::debug!(
        videos = snapshot.videos.len(),
        traffic_rows = snapshot.traffic_sources.rows.len(),
        search_terms = snapshot.search_terms.rows.len(),
        loyalty_rows = snapshot.loyalty.rows.len(),
        retention_rows = snapshot.retention.rows.len(),
        "Loaded snapshot"
    );

    Ok(snapshot)
}
