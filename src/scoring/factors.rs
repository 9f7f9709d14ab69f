use anyhow::{bail, Result};

use super::config::ScoreBucket;

#[derive(Debug, Clone, PartialEq)]
pub enum RangeOp {
    LessThan(f64),
    LessEqual(f64),
    GreaterThan(f64),
    GreaterEqual(f64),
    Equal(f64),
    Between(f64, f64), // Inclusive range: N-M
    Any,
}

impl RangeOp {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "*" {
            Ok(RangeOp::Any)
        } else if let Some(val) = s.strip_prefix(">=") {
            Ok(RangeOp::GreaterEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix("<=") {
            Ok(RangeOp::LessEqual(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('>') {
            Ok(RangeOp::GreaterThan(val.trim().parse()?))
        } else if let Some(val) = s.strip_prefix('<') {
            Ok(RangeOp::LessThan(val.trim().parse()?))
        } else if let Ok(val) = s.parse::<f64>() {
            // Plain numbers first, so "1e-3" and "-2" are not read as ranges
            Ok(RangeOp::Equal(val))
        } else if let Some((low, high)) = s.split_once('-') {
            // Range format: "2-4"
            let low: f64 = low.trim().parse()?;
            let high: f64 = high.trim().parse()?;
            if low > high {
                bail!("Range start is above its end: {}", s)
            }
            Ok(RangeOp::Between(low, high))
        } else {
            bail!("Invalid range format: {}", s)
        }
    }

    /// NaN never satisfies a comparison, so it only matches `Any`.
    pub fn matches(&self, value: f64) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::LessEqual(n) => value <= *n,
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::GreaterEqual(n) => value >= *n,
            RangeOp::Equal(n) => value == *n,
            RangeOp::Between(low, high) => value >= *low && value <= *high,
            RangeOp::Any => true,
        }
    }
}

/// Score of the first bucket whose range matches `value`.
///
/// Buckets with unparseable ranges are skipped; `validate_scoring` reports
/// them at startup.
pub fn bucket_score(buckets: &[ScoreBucket], value: f64) -> Option<u8> {
    buckets.iter().find_map(|bucket| match RangeOp::parse(&bucket.range) {
        Ok(range) if range.matches(value) => Some(bucket.score),
        _ => None,
    })
}
