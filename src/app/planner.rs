use anyhow::Result;
use thiserror::Error;

pub(crate) const UNKNOWN_TITLE: &str = "Unknown Title";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlaylistEntry {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) duration: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedVideo {
    pub(crate) duration: u64,
    pub(crate) title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WatchRequest {
    /// 1-based position of the first video.
    pub(crate) start_index: usize,
    pub(crate) start_offset: u64,
    pub(crate) target_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WatchResult {
    /// 0-based index into the full entry list.
    pub(crate) stop_index: usize,
    pub(crate) stop_title: String,
    pub(crate) partial: bool,
    pub(crate) watched_into_stop: u64,
    pub(crate) stop_duration: u64,
    pub(crate) remaining: u64,
}

#[derive(Debug, Error)]
pub(crate) enum PlanError {
    #[error("playlist has no videos")]
    EmptyPlaylist,
    #[error("start video {start} is outside 1..={len}")]
    StartOutOfRange { start: usize, len: usize },
    #[error("watch budget must be greater than zero")]
    ZeroBudget,
    #[error("start offset {offset}s is not within the {duration}s starting video")]
    InvalidOffset { offset: u64, duration: u64 },
    #[error(transparent)]
    Resolution(#[from] anyhow::Error),
}

/// Walks the playlist from the requested start until the budget runs out.
///
/// `resolve` is called once for each visited entry that has no duration, in
/// playlist order, and never for entries after the stopping point. Reaching the
/// budget exactly at the end of a video stops on that video with nothing left
/// unwatched rather than moving on to the next one.
pub(crate) fn compute_stop<F>(
    entries: &[PlaylistEntry],
    request: &WatchRequest,
    mut resolve: F,
) -> Result<WatchResult, PlanError>
where
    F: FnMut(&str) -> Result<ResolvedVideo>,
{
    if entries.is_empty() {
        return Err(PlanError::EmptyPlaylist);
    }
    if request.start_index == 0 || request.start_index > entries.len() {
        return Err(PlanError::StartOutOfRange {
            start: request.start_index,
            len: entries.len(),
        });
    }
    if request.target_secs == 0 {
        return Err(PlanError::ZeroBudget);
    }

    let first = request.start_index - 1;
    let mut watched = 0_u64;
    let mut last_full = None;

    for (index, entry) in entries.iter().enumerate().skip(first) {
        let (duration, title) = match entry.duration {
            Some(duration) => (duration, entry.title.clone()),
            None => {
                log::debug!("no duration for entry {} ({}); looking it up", index + 1, entry.id);
                let resolved = resolve(&entry.id)?;
                (resolved.duration, resolved.title)
            }
        };

        let offset = if index == first {
            if request.start_offset >= duration {
                return Err(PlanError::InvalidOffset {
                    offset: request.start_offset,
                    duration,
                });
            }
            request.start_offset
        } else {
            0
        };

        let usable = duration - offset;
        if watched.saturating_add(usable) >= request.target_secs {
            let watched_into_stop = offset + (request.target_secs - watched);
            return Ok(WatchResult {
                stop_index: index,
                stop_title: title,
                partial: true,
                watched_into_stop,
                stop_duration: duration,
                remaining: duration - watched_into_stop,
            });
        }

        watched += usable;
        last_full = Some((index, duration, title));
    }

    let (stop_index, stop_duration, stop_title) = last_full.ok_or(PlanError::EmptyPlaylist)?;
    Ok(WatchResult {
        stop_index,
        stop_title,
        partial: false,
        watched_into_stop: stop_duration,
        stop_duration,
        remaining: 0,
    })
}
