use crate::scoring::{ChannelReport, SaturationStatus, TrendPhase, TrustLabel, TrustScore};

/// Subscriber share below this is called out as weak loyalty
const LOW_SUBSCRIBER_SHARE: f64 = 20.0;
/// Average retention below this is called out
const LOW_RETENTION: f64 = 35.0;

/// Rule-based commentary derived only from the report. Never empty.
pub fn static_insights(report: &ChannelReport) -> Vec<String> {
    let mut items = Vec::new();

    match &report.trust {
        Some(trust) => items.push(trust_insight(trust)),
        None => items.push(
            "Not enough recent uploads for a trust score yet. Publish more videos before reading trends."
                .to_string(),
        ),
    }

    if let Some(conflict) = report.cannibalization.first() {
        let loser = if conflict.winner_id == conflict.first.id {
            &conflict.second
        } else {
            &conflict.first
        };
        items.push(format!(
            "\"{}\" shares {}% of its title keywords with another upload and is losing on views. Give it a distinct angle.",
            loser.title, conflict.overlap
        ));
    }

    let dominant: Vec<&str> = report
        .trends
        .iter()
        .filter(|t| t.phase == TrendPhase::Dominant)
        .map(|t| t.term.as_str())
        .collect();
    if !dominant.is_empty() {
        items.push(format!(
            "Dominant search terms: {}. Make sure upcoming titles cover them.",
            dominant.join(", ")
        ));
    }

    for source in &report.saturation {
        match source.status {
            SaturationStatus::Underserved => items.push(format!(
                "{} brings {:.1}% of views and has room to grow. Favor searchable titles.",
                source.label, source.share_percent
            )),
            SaturationStatus::Oversaturated => items.push(format!(
                "{} brings {:.1}% of views. Reliance on recommendations is high.",
                source.label, source.share_percent
            )),
            SaturationStatus::Balanced => {}
        }
    }

    if let Some(ref loyalty) = report.loyalty {
        if loyalty.subscriber_share < LOW_SUBSCRIBER_SHARE {
            items.push(format!(
                "Only {:.1}% of views come from subscribers.",
                loyalty.subscriber_share
            ));
        }
    }

    if let Some(ref retention) = report.retention {
        if retention.weighted_avg_percentage < LOW_RETENTION {
            items.push(format!(
                "Average viewers watch {:.1}% of a video. Weakest is {} at {:.1}%.",
                retention.weighted_avg_percentage,
                retention.weakest_video_id,
                retention.weakest_percentage
            ));
        }
    }

    items
}

fn trust_insight(trust: &TrustScore) -> String {
    let weakest = [
        ("upload consistency", trust.consistency),
        ("performance stability", trust.stability),
        ("engagement", trust.engagement),
    ]
    .into_iter()
    .min_by_key(|(_, score)| *score)
    .map(|(name, _)| name)
    .unwrap_or("engagement");

    match trust.status {
        TrustLabel::Trusted => format!(
            "Trust score {} (Trusted). Keep the current upload rhythm.",
            trust.final_score
        ),
        TrustLabel::Stable => format!(
            "Trust score {} (Stable). Improving {} would move the channel to Trusted.",
            trust.final_score, weakest
        ),
        TrustLabel::AtRisk => format!(
            "Trust score {} (At Risk). Start with {}.",
            trust.final_score, weakest
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{AnalyticsReport, LoyaltyRow, SubscriptionStatus, TrafficRow};
    use crate::scoring::{assess, ScoringConfig};
    use crate::snapshot::ChannelSnapshot;

    #[test]
    fn test_empty_report_still_has_insight() {
        let report = assess(&ChannelSnapshot::default(), &ScoringConfig::default());
        let items = static_insights(&report);
        assert_eq!(items.len(), 1);
        assert!(items[0].contains("Not enough recent uploads"));
    }

    #[test]
    fn test_traffic_and_loyalty_insights() {
        let snapshot = ChannelSnapshot {
            traffic_sources: AnalyticsReport {
                rows: vec![
                    TrafficRow { source: "YT_SEARCH".to_string(), views: 25, secondary: None },
                    TrafficRow { source: "RELATED_VIDEO".to_string(), views: 75, secondary: None },
                ],
            },
            loyalty: AnalyticsReport {
                rows: vec![
                    LoyaltyRow { status: SubscriptionStatus::Subscribed, views: 10, avg_watch_seconds: 100.0 },
                    LoyaltyRow { status: SubscriptionStatus::Unsubscribed, views: 90, avg_watch_seconds: 50.0 },
                ],
            },
            ..ChannelSnapshot::default()
        };
        let report = assess(&snapshot, &ScoringConfig::default());
        let items = static_insights(&report);
        assert!(items.iter().any(|i| i.starts_with("YouTube Search brings 25.0%")));
        assert!(items.iter().any(|i| i.starts_with("Suggested Videos brings 75.0%")));
        assert!(items.iter().any(|i| i.contains("Only 10.0% of views")));
    }

    #[test]
    fn test_trust_insight_names_weakest() {
        let trust = TrustScore {
            final_score: 73,
            status: TrustLabel::Stable,
            consistency: 50,
            stability: 100,
            engagement: 60,
        };
        let text = trust_insight(&trust);
        assert!(text.contains("Stable"));
        assert!(text.contains("upload consistency"));
    }
}
