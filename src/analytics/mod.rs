pub mod rows;
pub mod types;

pub use rows::{AnalyticsReport, LoyaltyRow, RetentionRow, RowError, SubscriptionStatus, TrafficRow};
pub use types::VideoSummary;
