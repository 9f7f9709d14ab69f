use serde::{Deserialize, Serialize};

/// Scoring configuration.
///
/// Every field has a default, so a config file only needs to name the values
/// it overrides. Threshold tables are ordered bucket lists: the first bucket
/// whose range matches decides the score.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   window: 5
///   consistency:
///     - { range: "<7", score: 95 }
///     - { range: "<14", score: 80 }
///     - { range: "*", score: 50 }
///   weights:
///     stability: 0.5
///     engagement: 0.2
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Number of most recent videos the stability, engagement and trust
    /// scores look at. Fewer videos than this means no score.
    pub window: usize,

    /// How many videos at the head of the window count as "recent" for
    /// stability; the rest of the window is "older".
    pub recent: usize,

    /// Average upload gap in days -> consistency score
    pub consistency: Vec<ScoreBucket>,

    pub stability: StabilityConfig,

    /// Like rate in percent (likes per 100 views) -> engagement score
    pub engagement: Vec<ScoreBucket>,

    pub weights: TrustWeights,

    pub labels: TrustLabels,

    pub cannibalization: CannibalizationConfig,

    pub trends: TrendConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            window: 5,
            recent: 2,
            consistency: vec![
                ScoreBucket::new("<7", 95),
                ScoreBucket::new("<14", 80),
                ScoreBucket::new("*", 50),
            ],
            stability: StabilityConfig::default(),
            engagement: vec![
                ScoreBucket::new(">4", 100),
                ScoreBucket::new(">2", 80),
                ScoreBucket::new("*", 60),
            ],
            weights: TrustWeights::default(),
            labels: TrustLabels::default(),
            cannibalization: CannibalizationConfig::default(),
            trends: TrendConfig::default(),
        }
    }
}

/// Threshold bucket.
///
/// Range format: "<N", "<=N", ">N", ">=N", "N-M" (inclusive), "N" (exact)
/// or "*" (matches anything, including a missing value).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoreBucket {
    pub range: String,
    pub score: u8,
}

impl ScoreBucket {
    pub fn new(range: &str, score: u8) -> Self {
        Self {
            range: range.to_string(),
            score,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StabilityConfig {
    /// Score when recent videos average at least as many views as older ones
    pub rising: u8,
    /// Score when recent videos average fewer views
    pub declining: u8,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            rising: 100,
            declining: 70,
        }
    }
}

/// Weights of the composite trust score. Expected to sum to 1.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TrustWeights {
    pub consistency: f64,
    pub stability: f64,
    pub engagement: f64,
}

impl Default for TrustWeights {
    fn default() -> Self {
        Self {
            consistency: 0.3,
            stability: 0.4,
            engagement: 0.3,
        }
    }
}

/// Label cutoffs. Both are strict: a score equal to a cutoff falls into the
/// lower label.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TrustLabels {
    pub trusted_above: u8,
    pub stable_above: u8,
}

impl Default for TrustLabels {
    fn default() -> Self {
        Self {
            trusted_above: 85,
            stable_above: 65,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CannibalizationConfig {
    /// Shortest title word (in characters) that counts toward overlap
    pub min_word_length: usize,
    /// A pair conflicts when its word overlap ratio is strictly above this
    pub overlap_above: f64,
    pub max_conflicts: usize,
}

impl Default for CannibalizationConfig {
    fn default() -> Self {
        Self {
            min_word_length: 4,
            overlap_above: 0.5,
            max_conflicts: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TrendConfig {
    /// A term is dominant when its views exceed this multiple of the mean
    pub dominance_multiplier: f64,
    pub max_terms: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            dominance_multiplier: 1.5,
            max_terms: 8,
        }
    }
}
