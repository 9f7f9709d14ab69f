use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single video as returned by the Data API, flattened to the fields the
/// engine scores on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
    #[serde(deserialize_with = "count")]
    pub views: u64,
    #[serde(default, deserialize_with = "count")]
    pub likes: u64, // hidden like counts arrive as absent
    #[serde(default, deserialize_with = "count")]
    pub comments: u64,
}

/// A whole count from a float. None when negative, not finite, or too
/// large for u64.
pub(crate) fn float_count(f: f64) -> Option<u64> {
    // u64::MAX as f64 rounds up to 2^64, which itself does not fit
    (f.is_finite() && f >= 0.0 && f < u64::MAX as f64).then(|| f.round() as u64)
}

/// Statistics in the Data API are decimal strings ("viewCount": "1234"),
/// while exported or hand-written snapshots tend to use plain numbers.
fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Float(f64),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Float(f) => float_count(f).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "count must be a non-negative number below 2^64, got {}",
                f
            ))
        }),
        Count::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid count '{}'", s))),
    }
}
