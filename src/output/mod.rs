pub mod formatter;

pub use formatter::{
    format_experiments, format_gap, format_insights, format_json, format_report, format_views,
    should_use_colors,
};
