use serde::Serialize;
use std::fmt;

use super::config::TrendConfig;
use crate::analytics::TrafficRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendPhase {
    Dominant,
    Rising,
}

impl fmt::Display for TrendPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendPhase::Dominant => write!(f, "Dominant"),
            TrendPhase::Rising => write!(f, "Rising"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendTerm {
    pub term: String,
    pub views: u64,
    pub phase: TrendPhase,
}

/// Labels each search term against the mean of all terms, then keeps the
/// first `max_terms` rows in input order.
pub fn classify_trends(rows: &[TrafficRow], config: &TrendConfig) -> Vec<TrendTerm> {
    if rows.is_empty() {
        return Vec::new();
    }
    let mean = rows.iter().map(|r| r.views as f64).sum::<f64>() / rows.len() as f64;
    let threshold = mean * config.dominance_multiplier;

    rows.iter()
        .map(|row| TrendTerm {
            term: row.source.clone(),
            views: row.views,
            phase: if row.views as f64 > threshold {
                TrendPhase::Dominant
            } else {
                TrendPhase::Rising
            },
        })
        .take(config.max_terms)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SaturationStatus {
    Underserved,
    Oversaturated,
    Balanced,
}

impl fmt::Display for SaturationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaturationStatus::Underserved => write!(f, "Underserved"),
            SaturationStatus::Oversaturated => write!(f, "Oversaturated"),
            SaturationStatus::Balanced => write!(f, "Balanced"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSaturation {
    pub source: String,
    pub label: String,
    pub views: u64,
    pub share_percent: f64,
    pub status: SaturationStatus,
}

/// Human name for a traffic source code. Unknown codes are their own label.
pub fn source_label(code: &str) -> &str {
    match code {
        "YT_SEARCH" => "YouTube Search",
        "RELATED_VIDEO" => "Suggested Videos",
        "SUBSCRIBER" => "Browse Features",
        "EXT_URL" => "External Sites",
        "PLAYLIST" => "Playlists",
        "YT_PLAYLIST_PAGE" => "Playlist Pages",
        "NOTIFICATION" => "Notifications",
        "SHORTS" => "Shorts Feed",
        "YT_CHANNEL" => "Channel Pages",
        "YT_OTHER_PAGE" => "Other YouTube Pages",
        "END_SCREEN" => "End Screens",
        "ADVERTISING" => "Advertising",
        "NO_LINK_OTHER" => "Direct or Unknown",
        other => other,
    }
}

pub fn saturation_status(code: &str) -> SaturationStatus {
    match code {
        "YT_SEARCH" => SaturationStatus::Underserved,
        "RELATED_VIDEO" => SaturationStatus::Oversaturated,
        _ => SaturationStatus::Balanced,
    }
}

/// Table lookup per row; order is preserved.
pub fn classify_saturation(rows: &[TrafficRow]) -> Vec<SourceSaturation> {
    let total: f64 = rows.iter().map(|r| r.views as f64).sum();
    rows.iter()
        .map(|row| SourceSaturation {
            source: row.source.clone(),
            label: source_label(&row.source).to_string(),
            views: row.views,
            share_percent: if total == 0.0 {
                0.0
            } else {
                row.views as f64 / total * 100.0
            },
            status: saturation_status(&row.source),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(source: &str, views: u64) -> TrafficRow {
        TrafficRow {
            source: source.to_string(),
            views,
            secondary: None,
        }
    }

    #[test]
    fn test_trend_only_spike_is_dominant() {
        // mean 32.5, threshold 48.75
        let rows = vec![row("a", 10), row("b", 10), row("c", 10), row("d", 100)];
        let trends = classify_trends(&rows, &TrendConfig::default());
        let phases: Vec<TrendPhase> = trends.iter().map(|t| t.phase).collect();
        assert_eq!(
            phases,
            vec![
                TrendPhase::Rising,
                TrendPhase::Rising,
                TrendPhase::Rising,
                TrendPhase::Dominant
            ]
        );
    }

    #[test]
    fn test_trend_threshold_is_strict() {
        // mean 20, threshold 30
        let rows = vec![row("a", 30), row("b", 10), row("c", 20)];
        let trends = classify_trends(&rows, &TrendConfig::default());
        assert_eq!(trends[0].phase, TrendPhase::Rising);
    }

    #[test]
    fn test_trend_classifies_before_truncating() {
        // The spike sits past the cut but still raises the mean for everyone
        let mut rows: Vec<TrafficRow> = (0..8).map(|i| row(&format!("t{}", i), 20)).collect();
        rows.push(row("spike", 1000));
        let trends = classify_trends(&rows, &TrendConfig::default());
        assert_eq!(trends.len(), 8);
        assert!(trends.iter().all(|t| t.phase == TrendPhase::Rising));
        assert!(trends.iter().all(|t| t.term != "spike"));
    }

    #[test]
    fn test_trend_keeps_input_order() {
        let rows = vec![row("small", 1), row("big", 100), row("mid", 50)];
        let terms: Vec<String> = classify_trends(&rows, &TrendConfig::default())
            .into_iter()
            .map(|t| t.term)
            .collect();
        assert_eq!(terms, vec!["small", "big", "mid"]);
    }

    #[test]
    fn test_trend_empty() {
        assert!(classify_trends(&[], &TrendConfig::default()).is_empty());
    }

    #[test]
    fn test_trend_all_zero_views() {
        let rows = vec![row("a", 0), row("b", 0)];
        let trends = classify_trends(&rows, &TrendConfig::default());
        assert!(trends.iter().all(|t| t.phase == TrendPhase::Rising));
    }

    #[test]
    fn test_search_is_underserved_regardless_of_views() {
        for views in [0, 1, 1_000_000] {
            let result = classify_saturation(&[row("YT_SEARCH", views), row("EXT_URL", 5)]);
            assert_eq!(result[0].status, SaturationStatus::Underserved);
            assert_eq!(result[0].label, "YouTube Search");
        }
    }

    #[test]
    fn test_related_is_oversaturated() {
        let result = classify_saturation(&[row("RELATED_VIDEO", 10)]);
        assert_eq!(result[0].status, SaturationStatus::Oversaturated);
        assert_eq!(result[0].label, "Suggested Videos");
    }

    #[test]
    fn test_unknown_code_passes_through() {
        let result = classify_saturation(&[row("HOLOGRAM_FEED", 10)]);
        assert_eq!(result[0].label, "HOLOGRAM_FEED");
        assert_eq!(result[0].status, SaturationStatus::Balanced);
    }

    #[test]
    fn test_share_percent() {
        let result = classify_saturation(&[row("YT_SEARCH", 25), row("SUBSCRIBER", 75)]);
        assert_eq!(result[0].share_percent, 25.0);
        assert_eq!(result[1].share_percent, 75.0);
    }

    #[test]
    fn test_share_percent_zero_total() {
        let result = classify_saturation(&[row("YT_SEARCH", 0)]);
        assert_eq!(result[0].share_percent, 0.0);
    }

    #[test]
    fn test_share_percent_near_max_counts() {
        let result = classify_saturation(&[row("YT_SEARCH", u64::MAX), row("EXT_URL", 1)]);
        assert!((result[0].share_percent - 100.0).abs() < 1e-9);
        assert!(result[1].share_percent < 1e-9);
    }

    #[test]
    fn test_saturation_empty() {
        assert!(classify_saturation(&[]).is_empty());
    }
}
