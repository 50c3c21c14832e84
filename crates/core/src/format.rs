use chrono::{DateTime, Utc};

/// Format a duration in whole seconds as `M:SS`.
pub fn format_duration(total_seconds: u64) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Format a keyframe/reference timestamp for display.
pub fn format_timestamp(seconds: u32) -> String {
    format_duration(u64::from(seconds))
}

/// Parse an `M:SS` display duration back into whole seconds.
/// Used by the timeline to place tick marks.
pub fn parse_duration(display: &str) -> Option<u32> {
    let (minutes, seconds) = display.split_once(':')?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    let seconds: u32 = seconds.trim().parse().ok()?;
    Some(minutes * 60 + seconds)
}

/// Compact "time ago" label for history rows.
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}
