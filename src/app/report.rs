use crossterm::style::Stylize;

use super::planner::WatchResult;

pub(crate) fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub(crate) fn format_unwatched(secs: u64) -> String {
    let minutes = secs / 60;
    let seconds = secs % 60;

    let mut parts = Vec::new();
    if minutes > 0 {
        parts.push(pluralize(minutes, "minute"));
    }
    if seconds > 0 {
        parts.push(pluralize(seconds, "second"));
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({} unwatched)", parts.join(" and "))
    }
}

fn pluralize(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// The two report lines: which video to stop on, and where inside it.
pub(crate) fn render_report(result: &WatchResult, emphasis: bool) -> [String; 2] {
    let video = format!("{} -> {}", result.stop_index + 1, result.stop_title);
    let position = format!(
        "{} / {}",
        format_clock(result.watched_into_stop),
        format_clock(result.stop_duration)
    );

    [
        format!("Watch till video: {}", emphasize(video, emphasis)),
        format!(
            "Watch until: {}{}",
            emphasize(position, emphasis),
            format_unwatched(result.remaining)
        ),
    ]
}

fn emphasize(text: String, emphasis: bool) -> String {
    if emphasis {
        text.bold().to_string()
    } else {
        text
    }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    let mut out = s.to_string();
    if out.chars().count() > max {
        out = out.chars().take(max.saturating_sub(3)).collect::<String>() + "...";
    }
    out
}
