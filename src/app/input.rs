use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static PLAYLIST_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(www\.)?youtube\.com/playlist\?list=").expect("valid playlist regex")
});

static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+):([0-5]?[0-9])$").expect("valid timestamp regex"));

/// Rejections from the input parsers. The display text is what the user sees
/// before being asked again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ValidationError {
    #[error("Invalid playlist URL format.")]
    PlaylistUrl,
    #[error("Invalid input. Please enter an integer.")]
    NotAnInteger,
    #[error("Please enter a positive number.")]
    NonPositive,
    #[error("That is more minutes than can be counted.")]
    BudgetTooLarge,
    #[error("Please give either a video number or \u{201c}number mm:ss\u{201d}.")]
    WrongTokenCount,
    #[error("Video number must be an integer.")]
    VideoNotAnInteger,
    #[error("Number out of range.")]
    OutOfRange,
    #[error("Timestamp must be in mm:ss (e.g. 4:07).")]
    MalformedTimestamp,
    #[error("Please answer y or n.")]
    NotYesNo,
    #[error("Enter a number.")]
    NotANumber,
    #[error("Playlist name cannot be empty.")]
    EmptyName,
}

pub(crate) fn parse_playlist_url(raw: &str) -> Result<String, ValidationError> {
    let url = raw.trim();
    if PLAYLIST_URL_RE.is_match(url) {
        Ok(url.to_string())
    } else {
        Err(ValidationError::PlaylistUrl)
    }
}

/// Parses a positive number of minutes and returns the budget in seconds.
pub(crate) fn parse_watch_minutes(raw: &str) -> Result<u64, ValidationError> {
    let minutes = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::NotAnInteger)?;
    if minutes <= 0 {
        return Err(ValidationError::NonPositive);
    }
    (minutes as u64)
        .checked_mul(60)
        .ok_or(ValidationError::BudgetTooLarge)
}

/// Accepts `"7"` or `"7 4:57"` and returns `(video_number, offset_seconds)`.
pub(crate) fn parse_start_position(
    raw: &str,
    max_index: usize,
) -> Result<(usize, u64), ValidationError> {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    if !matches!(parts.len(), 1 | 2) {
        return Err(ValidationError::WrongTokenCount);
    }

    let video = parts[0]
        .parse::<i64>()
        .map_err(|_| ValidationError::VideoNotAnInteger)?;
    if video < 1 || video as u64 > max_index as u64 {
        return Err(ValidationError::OutOfRange);
    }

    let offset = match parts.get(1) {
        Some(stamp) => parse_timestamp(stamp)?,
        None => 0,
    };

    Ok((video as usize, offset))
}

fn parse_timestamp(raw: &str) -> Result<u64, ValidationError> {
    let caps = TIMESTAMP_RE
        .captures(raw)
        .ok_or(ValidationError::MalformedTimestamp)?;
    let minutes = caps[1]
        .parse::<u64>()
        .map_err(|_| ValidationError::MalformedTimestamp)?;
    let seconds = caps[2]
        .parse::<u64>()
        .map_err(|_| ValidationError::MalformedTimestamp)?;
    minutes
        .checked_mul(60)
        .and_then(|secs| secs.checked_add(seconds))
        .ok_or(ValidationError::MalformedTimestamp)
}

pub(crate) fn parse_yes_no(raw: &str) -> Result<bool, ValidationError> {
    match raw.trim().to_lowercase().as_str() {
        "y" => Ok(true),
        "n" => Ok(false),
        _ => Err(ValidationError::NotYesNo),
    }
}

/// Parses a 1-based menu pick and returns the 0-based position.
pub(crate) fn parse_menu_choice(raw: &str, len: usize) -> Result<usize, ValidationError> {
    let choice = raw.trim();
    if choice.is_empty() || !choice.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(ValidationError::NotANumber);
    }
    match choice.parse::<usize>() {
        Ok(idx) if (1..=len).contains(&idx) => Ok(idx - 1),
        _ => Err(ValidationError::OutOfRange),
    }
}

pub(crate) fn parse_playlist_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}
