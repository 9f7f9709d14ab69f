use serde::Serialize;
use std::collections::HashSet;

use super::config::CannibalizationConfig;
use crate::analytics::VideoSummary;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRef {
    pub id: String,
    pub title: String,
    pub views: u64,
}

impl From<&VideoSummary> for VideoRef {
    fn from(video: &VideoSummary) -> Self {
        Self {
            id: video.id.clone(),
            title: video.title.clone(),
            views: video.views,
        }
    }
}

/// Two videos whose titles compete for the same words.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub first: VideoRef,
    pub second: VideoRef,
    /// Word overlap ratio as a whole percentage
    pub overlap: u8,
    /// Shared words, in the order they appear in the first title
    pub shared_words: Vec<String>,
    pub winner_id: String,
}

/// Lowercased title words of at least `min_len` characters, first
/// occurrence order, without duplicates.
pub fn title_words(title: &str, min_len: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|word| word.chars().count() >= min_len)
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

/// Shared words divided by the size of the smaller word set. Not Jaccard:
/// a short title fully contained in a long one scores 1.0.
pub fn word_overlap(a: &[String], b: &[String]) -> f64 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    let shared = a.iter().filter(|word| b.contains(word)).count();
    shared as f64 / smaller as f64
}

/// Checks every pair (i < j) in input order and returns the first
/// `max_conflicts` pairs above the overlap threshold, in discovery order.
///
/// On equal views the first video of the pair is the winner.
pub fn find_conflicts(videos: &[VideoSummary], config: &CannibalizationConfig) -> Vec<Conflict> {
    let words: Vec<Vec<String>> = videos
        .iter()
        .map(|v| title_words(&v.title, config.min_word_length))
        .collect();

    let mut conflicts = Vec::new();
    for i in 0..videos.len() {
        for j in (i + 1)..videos.len() {
            if conflicts.len() >= config.max_conflicts {
                return conflicts;
            }

            let ratio = word_overlap(&words[i], &words[j]);
            if ratio <= config.overlap_above {
                continue;
            }

            let (first, second) = (&videos[i], &videos[j]);
            let winner = if second.views > first.views { second } else { first };
            let shared_words = words[i]
                .iter()
                .filter(|word| words[j].contains(word))
                .cloned()
                .collect();

            conflicts.push(Conflict {
                first: first.into(),
                second: second.into(),
                overlap: (ratio * 100.0).round() as u8,
                shared_words,
                winner_id: winner.id.clone(),
            });
        }
    }
    conflicts
}
