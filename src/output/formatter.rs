use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use std::time::Duration;
use terminal_size::{terminal_size, Width};

use crate::experiments::ExperimentLog;
use crate::insights::Insights;
use crate::scoring::{ChannelReport, SaturationStatus, TrendPhase, TrustLabel};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate title to fit available width, accounting for Unicode
fn truncate_title(title: &str, max_width: usize) -> String {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= max_width {
        title.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Title width for a line with `fixed` characters of other columns
fn title_width(fixed: usize) -> Option<usize> {
    get_terminal_width().map(|width| if width > fixed + 10 { width - fixed } else { 20 })
}

fn fit_title(title: &str, fixed: usize) -> String {
    match title_width(fixed) {
        Some(width) => truncate_title(title, width),
        None => title.to_string(),
    }
}

/// Format an average gap in days as "4days 12h"
pub fn format_gap(days: f64) -> String {
    if !days.is_finite() || days <= 0.0 {
        return "0s".to_string();
    }
    // Minute precision is plenty for upload cadence
    let minutes = (days * 24.0 * 60.0).round() as u64;
    humantime::format_duration(Duration::from_secs(minutes * 60)).to_string()
}

/// Format a view count in compact notation (1.5k, 2.3M, 847)
pub fn format_views(views: u64) -> String {
    let views = views as f64;
    let formatted = if views >= 1_000_000.0 {
        format!("{:.1}M", views / 1_000_000.0)
    } else if views >= 1_000.0 {
        format!("{:.1}k", views / 1_000.0)
    } else {
        format!("{:.0}", views)
    };

    // Trim trailing .0 (e.g., "1.0k" -> "1k")
    formatted.replace(".0M", "M").replace(".0k", "k")
}

fn heading(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().underline().to_string()
    } else {
        text.to_string()
    }
}

fn trust_line(label: TrustLabel, score: u8, use_colors: bool) -> String {
    let text = format!("{:>3}  {}", score, label);
    if !use_colors {
        return text;
    }
    match label {
        TrustLabel::Trusted => text.green().bold().to_string(),
        TrustLabel::Stable => text.yellow().bold().to_string(),
        TrustLabel::AtRisk => text.red().bold().to_string(),
    }
}

/// Format the report as a sectioned plain-text table.
/// Sections with nothing to show are omitted.
pub fn format_report(report: &ChannelReport, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let channel = report.channel.as_deref().unwrap_or("Channel");
    lines.push(heading(
        &format!("{} ({} videos)", channel, report.video_count),
        use_colors,
    ));

    if let Some(ref trust) = report.trust {
        lines.push(format!(
            "  Trust:        {}",
            trust_line(trust.status, trust.final_score, use_colors)
        ));
        lines.push(format!("  Consistency:  {:>3}", trust.consistency));
        lines.push(format!("  Stability:    {:>3}", trust.stability));
        lines.push(format!("  Engagement:   {:>3}", trust.engagement));
    } else if let Some(consistency) = report.consistency {
        lines.push(format!("  Consistency:  {:>3}", consistency));
    }

    if let Some(rate) = report.engagement_rate {
        lines.push(format!("  Like rate:    {:.2}%", rate));
    }
    if let Some(gap) = report.avg_upload_gap_days {
        lines.push(format!("  Upload gap:   {}", format_gap(gap)));
    }

    if !report.cannibalization.is_empty() {
        lines.push(String::new());
        lines.push(heading("Overlapping titles", use_colors));
        for (idx, conflict) in report.cannibalization.iter().enumerate() {
            let index_str = format!("{:>2}.", idx + 1);
            let overlap = format!("{:>3}%", conflict.overlap);
            // index + overlap + separators + " vs " joins two titles
            let fixed = 3 + 1 + 4 + 2 + 4;
            let half = title_width(fixed).map(|w| w / 2);
            let (a, b) = match half {
                Some(w) => (
                    truncate_title(&conflict.first.title, w),
                    truncate_title(&conflict.second.title, w),
                ),
                None => (conflict.first.title.clone(), conflict.second.title.clone()),
            };
            if use_colors {
                lines.push(format!("{} {}  {} vs {}", index_str.dimmed(), overlap.bold(), a, b));
            } else {
                lines.push(format!("{} {}  {} vs {}", index_str, overlap, a, b));
            }
        }
    }

    if !report.trends.is_empty() {
        lines.push(String::new());
        lines.push(heading("Search terms", use_colors));
        for term in &report.trends {
            let views = format!("{:>7}", format_views(term.views));
            let phase = format!("{:<8}", term.phase);
            let title = fit_title(&term.term, 7 + 2 + 8 + 2);
            if use_colors && term.phase == TrendPhase::Dominant {
                lines.push(format!("{}  {}  {}", views, phase.cyan(), title));
            } else {
                lines.push(format!("{}  {}  {}", views, phase, title));
            }
        }
    }

    if !report.saturation.is_empty() {
        lines.push(String::new());
        lines.push(heading("Traffic sources", use_colors));
        for source in &report.saturation {
            let share = format!("{:>5.1}%", source.share_percent);
            let status = format!("{:<13}", source.status);
            let status = if use_colors {
                match source.status {
                    SaturationStatus::Underserved => status.green().to_string(),
                    SaturationStatus::Oversaturated => status.red().to_string(),
                    SaturationStatus::Balanced => status.dimmed().to_string(),
                }
            } else {
                status
            };
            lines.push(format!(
                "{}  {}  {} ({})",
                share,
                status,
                source.label,
                format_views(source.views)
            ));
        }
    }

    if let Some(ref loyalty) = report.loyalty {
        lines.push(String::new());
        lines.push(heading("Audience", use_colors));
        lines.push(format!(
            "  Subscribers:  {:.1}% of views ({} of {})",
            loyalty.subscriber_share,
            format_views(loyalty.subscribed_views),
            format_views(loyalty.subscribed_views.saturating_add(loyalty.unsubscribed_views))
        ));
        if let Some(secs) = loyalty.subscribed_avg_watch_seconds {
            lines.push(format!("  Watch (subs): {:.0}s", secs));
        }
        if let Some(secs) = loyalty.unsubscribed_avg_watch_seconds {
            lines.push(format!("  Watch (new):  {:.0}s", secs));
        }
    }

    if let Some(ref retention) = report.retention {
        lines.push(String::new());
        lines.push(heading("Retention", use_colors));
        lines.push(format!(
            "  Average:      {:.1}% over {} videos",
            retention.weighted_avg_percentage, retention.videos
        ));
        lines.push(format!(
            "  Weakest:      {} at {:.1}%",
            retention.weakest_video_id, retention.weakest_percentage
        ));
    }

    if !report.notices.is_empty() {
        lines.push(String::new());
        for notice in &report.notices {
            if use_colors {
                lines.push(format!("{} {}", "note:".yellow(), notice));
            } else {
                lines.push(format!("note: {}", notice));
            }
        }
    }

    lines.join("\n")
}

/// Format insights as a numbered list with the answering provider
pub fn format_insights(insights: &Insights, use_colors: bool) -> String {
    let title = format!("Insights ({})", insights.source);
    let mut lines = vec![heading(&title, use_colors)];
    for (idx, item) in insights.items.iter().enumerate() {
        let index_str = format!("{:>2}.", idx + 1);
        if use_colors {
            lines.push(format!("{} {}", index_str.dimmed(), item));
        } else {
            lines.push(format!("{} {}", index_str, item));
        }
    }
    lines.join("\n")
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    report: &'a ChannelReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    insights: Option<&'a Insights>,
}

/// Format the report (and insights, when generated) as pretty JSON
pub fn format_json(report: &ChannelReport, insights: Option<&Insights>) -> Result<String> {
    serde_json::to_string_pretty(&JsonOutput { report, insights })
        .context("Failed to serialize report")
}

/// Format the experiment log, one line per entry with a 1-based index
pub fn format_experiments(log: &ExperimentLog, now: DateTime<Utc>, use_colors: bool) -> String {
    if log.entries.is_empty() {
        return "No experiments recorded.".to_string();
    }

    let mut lines: Vec<String> = log
        .entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let index_str = format!("{:>2}.", idx + 1);
            let days = format!("{:>4}d", entry.days_running(now));
            let state = match entry.outcome {
                Some(ref outcome) => format!("done: {}", outcome),
                None => "running".to_string(),
            };
            let video = entry
                .video_id
                .as_deref()
                .map(|id| format!(" [{}]", id))
                .unwrap_or_default();

            if use_colors {
                let state = if entry.is_running() {
                    state.yellow().to_string()
                } else {
                    state.green().to_string()
                };
                format!(
                    "{} {}  {}{}  {}\n      {}",
                    index_str.dimmed(),
                    days,
                    entry.name.bold(),
                    video,
                    state,
                    entry.hypothesis.dimmed()
                )
            } else {
                format!(
                    "{} {}  {}{}  {}\n      {}",
                    index_str, days, entry.name, video, state, entry.hypothesis
                )
            }
        })
        .collect();

    let running = log.running().count();
    lines.push(format!(
        "{} running, {} concluded",
        running,
        log.entries.len() - running
    ));
    lines.join("\n")
}
