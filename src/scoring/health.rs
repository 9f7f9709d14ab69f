use serde::Serialize;
use std::fmt;

use super::config::{ScoringConfig, TrustLabels, TrustWeights};
use super::error::ScoreError;
use super::factors::bucket_score;
use crate::analytics::VideoSummary;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Consistency needs at least one gap, i.e. two uploads.
pub const MIN_CONSISTENCY_VIDEOS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrustLabel {
    Trusted,
    Stable,
    #[serde(rename = "At Risk")]
    AtRisk,
}

impl TrustLabel {
    pub fn classify(score: u8, labels: &TrustLabels) -> Self {
        if score > labels.trusted_above {
            TrustLabel::Trusted
        } else if score > labels.stable_above {
            TrustLabel::Stable
        } else {
            TrustLabel::AtRisk
        }
    }
}

impl fmt::Display for TrustLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrustLabel::Trusted => write!(f, "Trusted"),
            TrustLabel::Stable => write!(f, "Stable"),
            TrustLabel::AtRisk => write!(f, "At Risk"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustScore {
    pub final_score: u8,
    pub status: TrustLabel,
    pub consistency: u8,
    pub stability: u8,
    pub engagement: u8,
}

/// Mean absolute gap in fractional days between adjacent uploads.
///
/// Works on either sort direction since only absolute gaps are summed.
pub fn average_upload_gap_days(videos: &[VideoSummary]) -> Option<f64> {
    if videos.len() < MIN_CONSISTENCY_VIDEOS {
        return None;
    }
    let total: f64 = videos
        .windows(2)
        .map(|pair| {
            let gap = pair[0].published_at - pair[1].published_at;
            gap.num_milliseconds().abs() as f64 / MS_PER_DAY
        })
        .sum();
    Some(total / (videos.len() - 1) as f64)
}

pub fn consistency_score(videos: &[VideoSummary], config: &ScoringConfig) -> Result<u8, ScoreError> {
    ScoreError::require("consistency", MIN_CONSISTENCY_VIDEOS, videos.len())?;
    let gap = average_upload_gap_days(videos).unwrap_or(f64::NAN);
    Ok(bucket_score(&config.consistency, gap).unwrap_or(0))
}

/// Compares the head of the window against the rest of it. Takes the first
/// `config.window` videos as given; does not re-sort.
pub fn stability_score(videos: &[VideoSummary], config: &ScoringConfig) -> Result<u8, ScoreError> {
    ScoreError::require("stability", config.window, videos.len())?;
    let window = &videos[..config.window];
    let split = config.recent.min(window.len());
    let (recent, older) = window.split_at(split);

    if mean_views(recent) >= mean_views(older) {
        Ok(config.stability.rising)
    } else {
        Ok(config.stability.declining)
    }
}

/// Likes per hundred views over the window. Zero total views yields 0.
pub fn engagement_rate(videos: &[VideoSummary], config: &ScoringConfig) -> Result<f64, ScoreError> {
    ScoreError::require("engagement", config.window, videos.len())?;
    let window = &videos[..config.window];
    let views: f64 = window.iter().map(|v| v.views as f64).sum();
    let likes: f64 = window.iter().map(|v| v.likes as f64).sum();
    if views == 0.0 {
        return Ok(0.0);
    }
    Ok(likes / views * 100.0)
}

pub fn engagement_score(videos: &[VideoSummary], config: &ScoringConfig) -> Result<u8, ScoreError> {
    let rate = engagement_rate(videos, config)?;
    Ok(bucket_score(&config.engagement, rate).unwrap_or(0))
}

pub fn composite(consistency: u8, stability: u8, engagement: u8, weights: &TrustWeights) -> u8 {
    let weighted = consistency as f64 * weights.consistency
        + stability as f64 * weights.stability
        + engagement as f64 * weights.engagement;
    weighted.round().clamp(0.0, 100.0) as u8
}

pub fn trust_score(videos: &[VideoSummary], config: &ScoringConfig) -> Result<TrustScore, ScoreError> {
    ScoreError::require("trust", config.window, videos.len())?;

    let consistency = consistency_score(videos, config)?;
    let stability = stability_score(videos, config)?;
    let engagement = engagement_score(videos, config)?;
    let final_score = composite(consistency, stability, engagement, &config.weights);

    Ok(TrustScore {
        final_score,
        status: TrustLabel::classify(final_score, &config.labels),
        consistency,
        stability,
        engagement,
    })
}

fn mean_views(videos: &[VideoSummary]) -> f64 {
    if videos.is_empty() {
        return 0.0;
    }
    videos.iter().map(|v| v.views as f64).sum::<f64>() / videos.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn video(days_ago: i64, views: u64, likes: u64) -> VideoSummary {
        VideoSummary {
            id: format!("v{}", days_ago),
            title: "Weekly devlog".to_string(),
            published_at: base_time() - Duration::days(days_ago),
            views,
            likes,
            comments: 0,
        }
    }

    /// Five uploads, `gap` days apart, newest first.
    fn spaced(gap: i64, views: [u64; 5], likes: [u64; 5]) -> Vec<VideoSummary> {
        (0..5)
            .map(|i| video(i as i64 * gap, views[i], likes[i]))
            .collect()
    }

    #[test]
    fn test_gap_needs_two_videos() {
        assert_eq!(average_upload_gap_days(&[]), None);
        assert_eq!(average_upload_gap_days(&[video(0, 1, 0)]), None);
    }

    #[test]
    fn test_gap_either_direction() {
        let newest_first = vec![video(0, 1, 0), video(3, 1, 0), video(9, 1, 0)];
        let mut oldest_first = newest_first.clone();
        oldest_first.reverse();
        assert_eq!(average_upload_gap_days(&newest_first), Some(4.5));
        assert_eq!(average_upload_gap_days(&oldest_first), Some(4.5));
    }

    #[test]
    fn test_gap_fractional_days() {
        let mut late = video(0, 1, 0);
        late.published_at = base_time() + Duration::hours(12);
        let videos = vec![late, video(0, 1, 0)];
        assert_eq!(average_upload_gap_days(&videos), Some(0.5));
    }

    #[test]
    fn test_consistency_thresholds() {
        let config = ScoringConfig::default();
        let weekly_minus = vec![video(0, 1, 0), video(6, 1, 0)];
        let exactly_weekly = vec![video(0, 1, 0), video(7, 1, 0)];
        let fortnightly = vec![video(0, 1, 0), video(14, 1, 0)];
        assert_eq!(consistency_score(&weekly_minus, &config), Ok(95));
        assert_eq!(consistency_score(&exactly_weekly, &config), Ok(80));
        assert_eq!(consistency_score(&fortnightly, &config), Ok(50));
    }

    #[test]
    fn test_consistency_insufficient() {
        let config = ScoringConfig::default();
        let err = consistency_score(&[video(0, 1, 0)], &config).unwrap_err();
        assert_eq!(
            err,
            ScoreError::InsufficientData {
                metric: "consistency",
                required: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_stability_recent_ahead() {
        let config = ScoringConfig::default();
        let videos = spaced(7, [500, 500, 100, 100, 100], [0; 5]);
        assert_eq!(stability_score(&videos, &config), Ok(100));
    }

    #[test]
    fn test_stability_recent_behind() {
        let config = ScoringConfig::default();
        let videos = spaced(7, [100, 100, 500, 500, 500], [0; 5]);
        assert_eq!(stability_score(&videos, &config), Ok(70));
    }

    #[test]
    fn test_stability_equal_views() {
        let config = ScoringConfig::default();
        let videos = spaced(7, [300; 5], [0; 5]);
        assert_eq!(stability_score(&videos, &config), Ok(100));
    }

    #[test]
    fn test_stability_ignores_videos_past_window() {
        let config = ScoringConfig::default();
        let mut videos = spaced(7, [300; 5], [0; 5]);
        videos.push(video(40, 1_000_000, 0));
        assert_eq!(stability_score(&videos, &config), Ok(100));
    }

    #[test]
    fn test_stability_needs_five() {
        let config = ScoringConfig::default();
        let videos: Vec<_> = spaced(7, [300; 5], [0; 5]).into_iter().take(4).collect();
        assert!(matches!(
            stability_score(&videos, &config),
            Err(ScoreError::InsufficientData { required: 5, actual: 4, .. })
        ));
    }

    #[test]
    fn test_engagement_buckets() {
        let config = ScoringConfig::default();
        // 5% like rate
        let high = spaced(7, [100; 5], [5; 5]);
        // 3% like rate
        let mid = spaced(7, [100; 5], [3; 5]);
        // exactly 2% falls through to the lowest bucket
        let low = spaced(7, [100; 5], [2; 5]);
        assert_eq!(engagement_score(&high, &config), Ok(100));
        assert_eq!(engagement_score(&mid, &config), Ok(80));
        assert_eq!(engagement_score(&low, &config), Ok(60));
    }

    #[test]
    fn test_engagement_zero_views_is_lowest_bucket() {
        let config = ScoringConfig::default();
        let videos = spaced(7, [0; 5], [3; 5]);
        assert_eq!(engagement_rate(&videos, &config), Ok(0.0));
        assert_eq!(engagement_score(&videos, &config), Ok(60));
    }

    #[test]
    fn test_engagement_near_max_counts() {
        let config = ScoringConfig::default();
        let videos = spaced(7, [u64::MAX; 5], [u64::MAX / 20; 5]);
        let rate = engagement_rate(&videos, &config).unwrap();
        assert!((rate - 5.0).abs() < 1e-9);
        assert_eq!(engagement_score(&videos, &config), Ok(100));
    }

    #[test]
    fn test_engagement_likes_above_views() {
        let config = ScoringConfig::default();
        let videos = spaced(7, [10; 5], [50; 5]);
        assert_eq!(engagement_score(&videos, &config), Ok(100));
    }

    #[test]
    fn test_composite_rounding() {
        let weights = TrustWeights::default();
        // 28.5 + 40 + 30 = 98.5 rounds up
        assert_eq!(composite(95, 100, 100, &weights), 99);
        assert_eq!(composite(50, 100, 100, &weights), 85);
        assert_eq!(composite(50, 70, 60, &weights), 61);
    }

    #[test]
    fn test_label_boundaries() {
        let labels = TrustLabels::default();
        assert_eq!(TrustLabel::classify(86, &labels), TrustLabel::Trusted);
        assert_eq!(TrustLabel::classify(85, &labels), TrustLabel::Stable);
        assert_eq!(TrustLabel::classify(66, &labels), TrustLabel::Stable);
        assert_eq!(TrustLabel::classify(65, &labels), TrustLabel::AtRisk);
    }

    #[test]
    fn test_trust_full_flow() {
        let config = ScoringConfig::default();
        // Weekly-ish uploads (95), recent ahead (100), 5% likes (100)
        let videos = spaced(3, [900, 800, 100, 100, 100], [45, 40, 5, 5, 5]);
        let trust = trust_score(&videos, &config).unwrap();
        assert_eq!(trust.consistency, 95);
        assert_eq!(trust.stability, 100);
        assert_eq!(trust.engagement, 100);
        assert_eq!(trust.final_score, 99);
        assert_eq!(trust.status, TrustLabel::Trusted);
    }

    #[test]
    fn test_trust_at_risk() {
        let config = ScoringConfig::default();
        // Monthly uploads (50), declining (70), 1% likes (60)
        let videos = spaced(30, [10, 10, 500, 500, 500], [0, 0, 5, 5, 5]);
        let trust = trust_score(&videos, &config).unwrap();
        assert_eq!(trust.final_score, 61);
        assert_eq!(trust.status, TrustLabel::AtRisk);
    }

    #[test]
    fn test_trust_needs_five() {
        let config = ScoringConfig::default();
        let videos = vec![video(0, 1, 0), video(7, 1, 0)];
        assert!(matches!(
            trust_score(&videos, &config),
            Err(ScoreError::InsufficientData { metric: "trust", .. })
        ));
    }

    #[test]
    fn test_trust_serializes_final_score_and_status() {
        let config = ScoringConfig::default();
        let videos = spaced(30, [10, 10, 500, 500, 500], [0, 0, 5, 5, 5]);
        let json = serde_json::to_value(trust_score(&videos, &config).unwrap()).unwrap();
        assert_eq!(json["finalScore"], 61);
        assert_eq!(json["status"], "At Risk");
    }
}
