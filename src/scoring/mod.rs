pub mod audience;
pub mod cannibalization;
pub mod config;
pub mod engine;
pub mod error;
pub mod factors;
pub mod health;
pub mod traffic;
pub mod validation;

pub use audience::{summarize_loyalty, summarize_retention, LoyaltySummary, RetentionSummary};
pub use cannibalization::{find_conflicts, Conflict, VideoRef};
pub use config::*;
pub use engine::{assess, ChannelReport};
pub use error::ScoreError;
pub use factors::{bucket_score, RangeOp};
pub use health::{
    average_upload_gap_days, composite, consistency_score, engagement_rate, engagement_score,
    stability_score, trust_score, TrustLabel, TrustScore,
};
pub use traffic::{
    classify_saturation, classify_trends, saturation_status, source_label, SaturationStatus,
    SourceSaturation, TrendPhase, TrendTerm,
};
pub use validation::validate_scoring;
