use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const LOG_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentLog {
    pub version: u32,
    #[serde(default)]
    pub entries: Vec<ExperimentEntry>,
}

/// One change tried on the channel (a new thumbnail style, a title
/// pattern, an upload day) and what came of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentEntry {
    pub name: String,
    pub hypothesis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concluded_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

impl ExperimentEntry {
    pub fn is_running(&self) -> bool {
        self.concluded_at.is_none()
    }

    /// Days the experiment ran (or has been running so far)
    pub fn days_running(&self, now: DateTime<Utc>) -> i64 {
        let end = self.concluded_at.unwrap_or(now);
        (end - self.started_at).num_days().max(0)
    }
}

impl Default for ExperimentLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ExperimentLog {
    /// Create a new empty log with the current version
    pub fn new() -> Self {
        Self {
            version: LOG_VERSION,
            entries: Vec::new(),
        }
    }

    /// Start a new experiment and return its 1-based index
    pub fn start(
        &mut self,
        name: String,
        hypothesis: String,
        video_id: Option<String>,
        now: DateTime<Utc>,
    ) -> usize {
        self.entries.push(ExperimentEntry {
            name,
            hypothesis,
            video_id,
            started_at: now,
            concluded_at: None,
            outcome: None,
        });
        self.entries.len()
    }

    /// Record the outcome of the experiment at `index` (1-based).
    /// Returns false when no such experiment exists.
    pub fn conclude(&mut self, index: usize, outcome: String, now: DateTime<Utc>) -> bool {
        match index.checked_sub(1).and_then(|i| self.entries.get_mut(i)) {
            Some(entry) => {
                entry.concluded_at = Some(now);
                entry.outcome = Some(outcome);
                true
            }
            None => false,
        }
    }

    pub fn running(&self) -> impl Iterator<Item = &ExperimentEntry> {
        self.entries.iter().filter(|e| e.is_running())
    }
}
