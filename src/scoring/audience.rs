use serde::Serialize;

use crate::analytics::{LoyaltyRow, RetentionRow, SubscriptionStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltySummary {
    pub subscribed_views: u64,
    pub unsubscribed_views: u64,
    /// Percent of all views that came from subscribers
    pub subscriber_share: f64,
    pub subscribed_avg_watch_seconds: Option<f64>,
    pub unsubscribed_avg_watch_seconds: Option<f64>,
}

/// Splits views and watch time by subscription status. Watch time is
/// averaged weighted by views, since the API may return several rows per
/// status (one per day or per video).
pub fn summarize_loyalty(rows: &[LoyaltyRow]) -> Option<LoyaltySummary> {
    let ((subscribed_views, subscribed_total), subscribed_watch) =
        weighted_watch(rows, SubscriptionStatus::Subscribed);
    let ((unsubscribed_views, unsubscribed_total), unsubscribed_watch) =
        weighted_watch(rows, SubscriptionStatus::Unsubscribed);

    // Share comes from the f64 totals; the u64 counts saturate
    let total = subscribed_total + unsubscribed_total;
    if total == 0.0 {
        return None;
    }

    Some(LoyaltySummary {
        subscribed_views,
        unsubscribed_views,
        subscriber_share: subscribed_total / total * 100.0,
        subscribed_avg_watch_seconds: subscribed_watch,
        unsubscribed_avg_watch_seconds: unsubscribed_watch,
    })
}

/// Views for one status as a saturating count and as an f64 total, plus
/// the view-weighted watch time.
fn weighted_watch(rows: &[LoyaltyRow], status: SubscriptionStatus) -> ((u64, f64), Option<f64>) {
    let (count, views, watch) = rows
        .iter()
        .filter(|r| r.status == status)
        .fold((0u64, 0.0f64, 0.0f64), |(count, views, watch), r| {
            (
                count.saturating_add(r.views),
                views + r.views as f64,
                watch + r.views as f64 * r.avg_watch_seconds,
            )
        });
    if views == 0.0 {
        ((0, 0.0), None)
    } else {
        ((count, views), Some(watch / views))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionSummary {
    pub videos: usize,
    pub weighted_avg_percentage: f64,
    pub weakest_video_id: String,
    pub weakest_percentage: f64,
}

pub fn summarize_retention(rows: &[RetentionRow]) -> Option<RetentionSummary> {
    let total_views: f64 = rows.iter().map(|r| r.views as f64).sum();
    if total_views == 0.0 {
        return None;
    }

    let weighted: f64 = rows
        .iter()
        .map(|r| r.avg_view_percentage * r.views as f64)
        .sum();

    // Strict comparison keeps the first row on ties
    let weakest = rows.iter().fold(&rows[0], |weakest, r| {
        if r.avg_view_percentage < weakest.avg_view_percentage {
            r
        } else {
            weakest
        }
    });

    Some(RetentionSummary {
        videos: rows.len(),
        weighted_avg_percentage: weighted / total_views,
        weakest_video_id: weakest.video_id.clone(),
        weakest_percentage: weakest.avg_view_percentage,
    })
}
