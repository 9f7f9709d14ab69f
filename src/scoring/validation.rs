use super::config::{ScoreBucket, ScoringConfig};
use super::factors::RangeOp;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Window and recent split
    if config.recent == 0 {
        errors.push("scoring.recent: must be at least 1".to_string());
    }
    if config.window <= config.recent {
        errors.push(format!(
            "scoring.window: must be larger than scoring.recent ({})",
            config.recent
        ));
    }

    validate_buckets("scoring.consistency", &config.consistency, &mut errors);
    validate_buckets("scoring.engagement", &config.engagement, &mut errors);

    if config.stability.rising > 100 {
        errors.push("scoring.stability.rising: must be at most 100".to_string());
    }
    if config.stability.declining > 100 {
        errors.push("scoring.stability.declining: must be at most 100".to_string());
    }

    // Trust weights
    let weights = &config.weights;
    for (name, value) in [
        ("consistency", weights.consistency),
        ("stability", weights.stability),
        ("engagement", weights.engagement),
    ] {
        if !(0.0..=1.0).contains(&value) {
            errors.push(format!("scoring.weights.{}: must be between 0 and 1", name));
        }
    }
    let sum = weights.consistency + weights.stability + weights.engagement;
    if (sum - 1.0).abs() > 1e-6 {
        errors.push(format!("scoring.weights: must sum to 1, got {}", sum));
    }

    // Labels
    let labels = &config.labels;
    if labels.trusted_above > 100 {
        errors.push("scoring.labels.trusted_above: must be at most 100".to_string());
    }
    if labels.stable_above >= labels.trusted_above {
        errors.push(format!(
            "scoring.labels.stable_above: must be below trusted_above ({})",
            labels.trusted_above
        ));
    }

    // Cannibalization
    let cannibalization = &config.cannibalization;
    if cannibalization.min_word_length == 0 {
        errors.push("scoring.cannibalization.min_word_length: must be at least 1".to_string());
    }
    if !(0.0..1.0).contains(&cannibalization.overlap_above) {
        errors.push("scoring.cannibalization.overlap_above: must be in [0, 1)".to_string());
    }
    if cannibalization.max_conflicts == 0 {
        errors.push("scoring.cannibalization.max_conflicts: must be at least 1".to_string());
    }

    // Trends
    if config.trends.dominance_multiplier <= 0.0 || !config.trends.dominance_multiplier.is_finite() {
        errors.push("scoring.trends.dominance_multiplier: must be positive".to_string());
    }
    if config.trends.max_terms == 0 {
        errors.push("scoring.trends.max_terms: must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_buckets(path: &str, buckets: &[ScoreBucket], errors: &mut Vec<String>) {
    if buckets.is_empty() {
        errors.push(format!("{}: needs at least one bucket", path));
        return;
    }
    for (i, bucket) in buckets.iter().enumerate() {
        if let Err(e) = RangeOp::parse(&bucket.range) {
            errors.push(format!(
                "{}[{}].range: invalid '{}' - {}",
                path, i, bucket.range, e
            ));
        }
        if bucket.score > 100 {
            errors.push(format!("{}[{}].score: must be at most 100", path, i));
        }
    }
    // The catch-all gives NaN and out-of-range values a score
    let last = &buckets[buckets.len() - 1];
    if !matches!(RangeOp::parse(&last.range), Ok(RangeOp::Any)) {
        errors.push(format!("{}: last bucket must have range '*'", path));
    }
}
