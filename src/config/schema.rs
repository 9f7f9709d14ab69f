use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::insights::InsightsConfig;
use crate::scoring::ScoringConfig;

#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub scoring: Option<ScoringConfig>,
    pub insights: Option<InsightsConfig>,
    /// Where the experiment log lives (defaults to the config directory)
    pub data_dir: Option<PathBuf>,
}
