use serde::Serialize;

use super::audience::{summarize_loyalty, summarize_retention, LoyaltySummary, RetentionSummary};
use super::cannibalization::{find_conflicts, Conflict};
use super::config::ScoringConfig;
use super::error::ScoreError;
use super::health::{average_upload_gap_days, consistency_score, engagement_rate, trust_score, TrustScore};
use super::traffic::{classify_saturation, classify_trends, SourceSaturation, TrendTerm};
use crate::snapshot::ChannelSnapshot;

/// Everything derived from one snapshot. Scores that could not be computed
/// are `None` and explained in `notices`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelReport {
    pub channel: Option<String>,
    pub video_count: usize,
    pub avg_upload_gap_days: Option<f64>,
    pub consistency: Option<u8>,
    pub engagement_rate: Option<f64>,
    pub trust: Option<TrustScore>,
    pub cannibalization: Vec<Conflict>,
    pub trends: Vec<TrendTerm>,
    pub saturation: Vec<SourceSaturation>,
    pub loyalty: Option<LoyaltySummary>,
    pub retention: Option<RetentionSummary>,
    pub notices: Vec<String>,
}

/// Run every transform over the snapshot. Pure: no I/O, no state kept
/// between calls.
pub fn assess(snapshot: &ChannelSnapshot, config: &ScoringConfig) -> ChannelReport {
    let videos = &snapshot.videos;
    let mut notices = Vec::new();

    let consistency = keep(consistency_score(videos, config), &mut notices);
    let engagement_rate = keep(engagement_rate(videos, config), &mut notices);
    let trust = keep(trust_score(videos, config), &mut notices);

    ChannelReport {
        channel: snapshot.channel.clone(),
        video_count: videos.len(),
        avg_upload_gap_days: average_upload_gap_days(videos),
        consistency,
        engagement_rate,
        trust,
        cannibalization: find_conflicts(videos, &config.cannibalization),
        trends: classify_trends(&snapshot.search_terms.rows, &config.trends),
        saturation: classify_saturation(&snapshot.traffic_sources.rows),
        loyalty: summarize_loyalty(&snapshot.loyalty.rows),
        retention: summarize_retention(&snapshot.retention.rows),
        notices,
    }
}

fn keep<T>(result: Result<T, ScoreError>, notices: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("{}", e);
            notices.push(e.to_string());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{AnalyticsReport, TrafficRow, VideoSummary};
    use crate::scoring::{SaturationStatus, TrendPhase, TrustLabel};
    use chrono::{Duration, TimeZone, Utc};

    fn video(id: &str, title: &str, days_ago: i64, views: u64, likes: u64) -> VideoSummary {
        VideoSummary {
            id: id.to_string(),
            title: title.to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap() - Duration::days(days_ago),
            views,
            likes,
            comments: 0,
        }
    }

    fn traffic(source: &str, views: u64) -> TrafficRow {
        TrafficRow {
            source: source.to_string(),
            views,
            secondary: None,
        }
    }

    fn sample_snapshot() -> ChannelSnapshot {
        ChannelSnapshot {
            channel: Some("Crust & Crumb".to_string()),
            videos: vec![
                video("v1", "Sourdough starter guide", 0, 900, 45),
                video("v2", "Focaccia in one hour", 4, 800, 40),
                video("v3", "Sourdough starter mistakes", 8, 100, 5),
                video("v4", "Baguette shaping basics", 12, 100, 5),
                video("v5", "Oven spring explained", 16, 100, 5),
            ],
            traffic_sources: AnalyticsReport {
                rows: vec![traffic("YT_SEARCH", 1200), traffic("RELATED_VIDEO", 3400)],
            },
            search_terms: AnalyticsReport {
                rows: vec![
                    traffic("sourdough", 10),
                    traffic("focaccia", 10),
                    traffic("baguette", 10),
                    traffic("starter", 100),
                ],
            },
            ..ChannelSnapshot::default()
        }
    }

    #[test]
    fn test_full_report() {
        let report = assess(&sample_snapshot(), &ScoringConfig::default());

        assert_eq!(report.video_count, 5);
        assert_eq!(report.avg_upload_gap_days, Some(4.0));
        assert_eq!(report.consistency, Some(95));
        assert_eq!(report.engagement_rate, Some(5.0));

        let trust = report.trust.unwrap();
        assert_eq!(trust.final_score, 99);
        assert_eq!(trust.status, TrustLabel::Trusted);

        assert_eq!(report.cannibalization.len(), 1);
        assert_eq!(report.cannibalization[0].winner_id, "v1");
        assert_eq!(report.cannibalization[0].second.id, "v3");

        assert_eq!(report.trends[3].phase, TrendPhase::Dominant);
        assert_eq!(report.saturation[0].status, SaturationStatus::Underserved);
        assert_eq!(report.saturation[1].status, SaturationStatus::Oversaturated);

        assert!(report.loyalty.is_none());
        assert!(report.retention.is_none());
        assert!(report.notices.is_empty());
    }

    #[test]
    fn test_too_few_videos_reports_notices() {
        let mut snapshot = sample_snapshot();
        snapshot.videos.truncate(3);
        let report = assess(&snapshot, &ScoringConfig::default());

        assert_eq!(report.consistency, Some(95));
        assert!(report.trust.is_none());
        assert!(report.engagement_rate.is_none());
        assert_eq!(report.notices.len(), 2);
        assert!(report.notices.iter().all(|n| n.contains("needs 5 videos, have 3")));
    }

    #[test]
    fn test_empty_snapshot() {
        let report = assess(&ChannelSnapshot::default(), &ScoringConfig::default());
        assert_eq!(report.video_count, 0);
        assert!(report.consistency.is_none());
        assert!(report.trust.is_none());
        assert!(report.cannibalization.is_empty());
        assert!(report.trends.is_empty());
        assert!(report.saturation.is_empty());
        assert_eq!(report.notices.len(), 3);
    }

    #[test]
    fn test_assess_is_idempotent() {
        let snapshot = sample_snapshot();
        let config = ScoringConfig::default();
        assert_eq!(assess(&snapshot, &config), assess(&snapshot, &config));
    }
}
