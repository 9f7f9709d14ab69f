use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::types::float_count;

/// A report from the Analytics API. Only `rows` is read; the API leaves the
/// key out entirely when a query matches nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "R: DeserializeOwned"))]
pub struct AnalyticsReport<R> {
    #[serde(default = "Vec::new", deserialize_with = "indexed_rows")]
    pub rows: Vec<R>,
}

/// Decode rows one by one so a failure names the row index.
fn indexed_rows<'de, D, R>(deserializer: D) -> Result<Vec<R>, D::Error>
where
    D: Deserializer<'de>,
    R: DeserializeOwned,
{
    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .enumerate()
        .map(|(i, row)| R::deserialize(row).map_err(|e| D::Error::custom(format!("row {}: {}", i, e))))
        .collect()
}

impl<R> Default for AnalyticsReport<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

#[derive(Debug, Error)]
pub enum RowError {
    #[error("expected at least {expected} columns, got {actual}")]
    Arity { expected: usize, actual: usize },
    #[error("column {index}: expected {kind}, got {value}")]
    Column {
        index: usize,
        kind: &'static str,
        value: Value,
    },
}

/// `[source, views, secondary?]`. Used both for traffic source breakdowns
/// (source is a code such as `YT_SEARCH`) and search term reports (source is
/// the term itself).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Value>", rename_all = "camelCase")]
pub struct TrafficRow {
    pub source: String,
    pub views: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<f64>,
}

impl TryFrom<Vec<Value>> for TrafficRow {
    type Error = RowError;

    fn try_from(row: Vec<Value>) -> Result<Self, Self::Error> {
        require_columns(&row, 2)?;
        let secondary = match row.get(2) {
            None | Some(Value::Null) => None,
            Some(_) => Some(number_at(&row, 2)?),
        };
        Ok(Self {
            source: text_at(&row, 0)?,
            views: count_at(&row, 1)?,
            secondary,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Subscribed,
    Unsubscribed,
}

/// `[subscribedStatus, views, averageViewDuration]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Value>", rename_all = "camelCase")]
pub struct LoyaltyRow {
    pub status: SubscriptionStatus,
    pub views: u64,
    pub avg_watch_seconds: f64,
}

impl TryFrom<Vec<Value>> for LoyaltyRow {
    type Error = RowError;

    fn try_from(row: Vec<Value>) -> Result<Self, Self::Error> {
        require_columns(&row, 3)?;
        let status = match row[0].as_str() {
            Some("SUBSCRIBED") => SubscriptionStatus::Subscribed,
            Some("UNSUBSCRIBED") => SubscriptionStatus::Unsubscribed,
            _ => {
                return Err(RowError::Column {
                    index: 0,
                    kind: "SUBSCRIBED or UNSUBSCRIBED",
                    value: row[0].clone(),
                })
            }
        };
        Ok(Self {
            status,
            views: count_at(&row, 1)?,
            avg_watch_seconds: non_negative_at(&row, 2)?,
        })
    }
}

/// `[videoId, averageViewPercentage, views]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Value>", rename_all = "camelCase")]
pub struct RetentionRow {
    pub video_id: String,
    pub avg_view_percentage: f64,
    pub views: u64,
}

impl TryFrom<Vec<Value>> for RetentionRow {
    type Error = RowError;

    fn try_from(row: Vec<Value>) -> Result<Self, Self::Error> {
        require_columns(&row, 3)?;
        Ok(Self {
            video_id: text_at(&row, 0)?,
            avg_view_percentage: non_negative_at(&row, 1)?,
            views: count_at(&row, 2)?,
        })
    }
}

fn require_columns(row: &[Value], expected: usize) -> Result<(), RowError> {
    if row.len() < expected {
        return Err(RowError::Arity {
            expected,
            actual: row.len(),
        });
    }
    Ok(())
}

fn text_at(row: &[Value], index: usize) -> Result<String, RowError> {
    row[index]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| RowError::Column {
            index,
            kind: "string",
            value: row[index].clone(),
        })
}

fn number_at(row: &[Value], index: usize) -> Result<f64, RowError> {
    let value = &row[index];
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed
        .filter(|n| n.is_finite())
        .ok_or_else(|| RowError::Column {
            index,
            kind: "number",
            value: value.clone(),
        })
}

fn non_negative_at(row: &[Value], index: usize) -> Result<f64, RowError> {
    let n = number_at(row, index)?;
    if n < 0.0 {
        return Err(RowError::Column {
            index,
            kind: "non-negative number",
            value: row[index].clone(),
        });
    }
    Ok(n)
}

// Analytics metrics come back as JSON numbers, occasionally with a
// fractional part (e.g. 1200.0).
fn count_at(row: &[Value], index: usize) -> Result<u64, RowError> {
    if let Some(n) = row[index].as_u64() {
        return Ok(n);
    }
    number_at(row, index)
        .ok()
        .and_then(float_count)
        .ok_or_else(|| RowError::Column {
            index,
            kind: "count",
            value: row[index].clone(),
        })
}
