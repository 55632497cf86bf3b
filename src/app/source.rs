use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command as ProcessCommand;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use super::planner::{PlaylistEntry, ResolvedVideo, UNKNOWN_TITLE};

/// Where playlist metadata comes from.
pub(crate) trait PlaylistSource {
    fn fetch_playlist(&self, url: &str) -> Result<Vec<PlaylistEntry>>;

    /// Slow per-video lookup for entries the playlist listing left without a duration.
    fn resolve_video(&self, id: &str) -> Result<ResolvedVideo>;
}

pub(crate) struct YtDlp {
    bin: PathBuf,
}

impl YtDlp {
    pub(crate) fn from_env() -> Self {
        Self {
            bin: resolve_ytdlp_bin_from_env(env::var_os("WATCHTILL_YTDLP_BIN")),
        }
    }

    fn run_json(&self, args: &[&str]) -> Result<String> {
        log::debug!("running {} {}", self.bin.display(), args.join(" "));
        let output = ProcessCommand::new(&self.bin)
            .args(args)
            .output()
            .with_context(|| format!("failed to launch {}", self.bin.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            if detail.is_empty() {
                bail!("{} exited with status {}", self.bin.display(), output.status);
            }
            let truncated = detail.chars().take(240).collect::<String>();
            bail!(
                "{} exited with status {} ({truncated})",
                self.bin.display(),
                output.status
            );
        }

        String::from_utf8(output.stdout)
            .with_context(|| format!("{} produced non UTF-8 output", self.bin.display()))
    }
}

impl PlaylistSource for YtDlp {
    fn fetch_playlist(&self, url: &str) -> Result<Vec<PlaylistEntry>> {
        let raw = self
            .run_json(&["--flat-playlist", "--dump-single-json", "--no-warnings", url])
            .with_context(|| format!("failed to fetch playlist {url}"))?;
        parse_playlist_json(&raw)
    }

    fn resolve_video(&self, id: &str) -> Result<ResolvedVideo> {
        let url = watch_url(id);
        let raw = self
            .run_json(&["--dump-json", "--skip-download", "--no-warnings", url.as_str()])
            .with_context(|| format!("failed to look up video {url}"))?;
        parse_video_json(&raw)
    }
}

pub(crate) fn resolve_ytdlp_bin_from_env(env_value: Option<OsString>) -> PathBuf {
    match env_value {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => PathBuf::from("yt-dlp"),
    }
}

pub(crate) fn watch_url(id: &str) -> String {
    if id.contains("youtube") {
        id.to_string()
    } else {
        format!("https://www.youtube.com/watch?v={id}")
    }
}

#[derive(Debug, Deserialize)]
struct YtDlpPlaylistInfo {
    entries: Option<Vec<Option<YtDlpEntry>>>,
}

#[derive(Debug, Deserialize)]
struct YtDlpEntry {
    id: Option<String>,
    url: Option<String>,
    title: Option<String>,
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YtDlpVideoInfo {
    title: Option<String>,
    duration: Option<f64>,
}

fn whole_seconds(duration: f64) -> u64 {
    if duration.is_finite() && duration > 0.0 {
        duration as u64
    } else {
        0
    }
}

fn title_or_unknown(title: Option<String>) -> String {
    title.unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

/// Video numbers typed by the user are playlist positions, so an item that
/// cannot be read fails the whole listing instead of shifting later videos.
pub(crate) fn parse_playlist_json(raw: &str) -> Result<Vec<PlaylistEntry>> {
    let info: YtDlpPlaylistInfo =
        serde_json::from_str(raw).context("unexpected playlist JSON from yt-dlp")?;

    let mut entries = Vec::new();
    for (position, entry) in info.entries.unwrap_or_default().into_iter().enumerate() {
        let Some(entry) = entry else {
            bail!("playlist item {} is empty in yt-dlp output", position + 1);
        };
        let Some(id) = entry.url.or(entry.id).filter(|id| !id.trim().is_empty()) else {
            bail!("playlist item {} has no video id in yt-dlp output", position + 1);
        };
        entries.push(PlaylistEntry {
            id,
            title: title_or_unknown(entry.title),
            duration: entry.duration.map(whole_seconds),
        });
    }
    Ok(entries)
}

pub(crate) fn parse_video_json(raw: &str) -> Result<ResolvedVideo> {
    let info: YtDlpVideoInfo =
        serde_json::from_str(raw).context("unexpected video JSON from yt-dlp")?;
    Ok(ResolvedVideo {
        duration: info.duration.map(whole_seconds).unwrap_or(0),
        title: title_or_unknown(info.title),
    })
}
