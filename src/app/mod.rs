mod input;
mod planner;
mod prompt;
mod report;
mod source;


use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;

use crate::cli::{Cli, Command, PlanArgs};
use crate::paths::playlist_store_path;
use crate::store::PlaylistStore;

use self::input::{
    ValidationError, parse_playlist_name, parse_playlist_url, parse_start_position,
    parse_watch_minutes,
};
use self::planner::{PlanError, WatchRequest, compute_stop};
use self::prompt::Prompter;
use self::report::{render_report, truncate};
use self::source::{PlaylistSource, YtDlp};

const EXIT_OK: u8 = 0;
const EXIT_INVALID_INPUT: u8 = 2;
const EXIT_INVALID_OFFSET: u8 = 3;

/// How a planning session ended when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlanOutcome {
    Reported,
    EmptyPlaylist,
    InvalidInput,
    InvalidOffset,
}

impl PlanOutcome {
    pub(crate) fn status(self) -> u8 {
        match self {
            Self::Reported | Self::EmptyPlaylist => EXIT_OK,
            Self::InvalidInput => EXIT_INVALID_INPUT,
            Self::InvalidOffset => EXIT_INVALID_OFFSET,
        }
    }
}

pub fn run(cli: Cli) -> Result<ExitCode> {
    let store_path = playlist_store_path(cli.store)?;

    let status = match cli.command {
        Some(Command::Plan(args)) => run_plan(&store_path, &args)?,
        None => run_plan(&store_path, &PlanArgs::default())?,
        Some(Command::List) => run_list(&store_path),
        Some(Command::Save { name, url }) => run_save(&store_path, &name, &url)?,
        Some(Command::Remove { name }) => run_remove(&store_path, &name)?,
    };
    Ok(ExitCode::from(status))
}

fn run_plan(store_path: &Path, args: &PlanArgs) -> Result<u8> {
    let store = PlaylistStore::open(store_path);
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout(), args.saved_playlists);
    let outcome = plan_session(&mut prompter, &YtDlp::from_env(), &store, args)?;
    Ok(outcome.status())
}

/// Values given on the command line are checked once; there is nobody to re-ask.
fn flag_value<T, R, W, F>(
    prompter: &mut Prompter<R, W>,
    flag: &str,
    raw: &str,
    parse: F,
) -> Result<Option<T>>
where
    R: BufRead,
    W: Write,
    F: FnOnce(&str) -> Result<T, ValidationError>,
{
    match parse(raw) {
        Ok(value) => Ok(Some(value)),
        Err(rejection) => {
            prompter.say(&format!("--{flag}: {rejection}"))?;
            Ok(None)
        }
    }
}

pub(crate) fn plan_session<R, W, S>(
    prompter: &mut Prompter<R, W>,
    source: &S,
    store: &PlaylistStore,
    args: &PlanArgs,
) -> Result<PlanOutcome>
where
    R: BufRead,
    W: Write,
    S: PlaylistSource,
{
    let url = match args.url.as_deref() {
        Some(raw) => match flag_value(prompter, "url", raw, parse_playlist_url)? {
            Some(url) => url,
            None => return Ok(PlanOutcome::InvalidInput),
        },
        None => prompter.playlist_url(store)?,
    };

    prompter.say("\nFetching playlist...")?;
    let entries = source.fetch_playlist(&url)?;
    if entries.is_empty() {
        prompter.say("No videos found in the playlist.")?;
        return Ok(PlanOutcome::EmptyPlaylist);
    }

    let target_secs = match args.minutes.as_deref() {
        Some(raw) => match flag_value(prompter, "minutes", raw, parse_watch_minutes)? {
            Some(secs) => secs,
            None => return Ok(PlanOutcome::InvalidInput),
        },
        None => prompter.watch_budget()?,
    };

    let (start_index, start_offset) = match args.start.as_deref() {
        Some(raw) => match flag_value(prompter, "start", raw, |raw| {
            parse_start_position(raw, entries.len())
        })? {
            Some(start) => start,
            None => return Ok(PlanOutcome::InvalidInput),
        },
        None => prompter.start_position(entries.len())?,
    };

    prompter.say("\nCalculating...\n")?;
    let request = WatchRequest {
        start_index,
        start_offset,
        target_secs,
    };
    match compute_stop(&entries, &request, |id| source.resolve_video(id)) {
        Ok(result) => {
            let [video_line, position_line] = render_report(&result, !args.plain);
            prompter.say(&format!("\n{video_line}"))?;
            prompter.say(&position_line)?;
            Ok(PlanOutcome::Reported)
        }
        Err(PlanError::InvalidOffset { offset, duration }) => {
            log::debug!("start offset {offset}s rejected for a {duration}s video");
            prompter.say("Timestamp exceeds video length; please try again.")?;
            Ok(PlanOutcome::InvalidOffset)
        }
        Err(err) => Err(err.into()),
    }
}

fn run_list(store_path: &Path) -> u8 {
    let store = PlaylistStore::open(store_path);
    if store.is_empty() {
        println!("No saved playlists yet. Run `watchtill save <name> <url>` first.");
        return EXIT_OK;
    }

    println!("{:<24} {}", "NAME", "URL");
    for item in store.playlists() {
        println!("{:<24} {}", truncate(&item.name, 24), item.url);
    }
    EXIT_OK
}

pub(crate) fn run_save(store_path: &Path, name: &str, url: &str) -> Result<u8> {
    let (name, url) = match (parse_playlist_name(name), parse_playlist_url(url)) {
        (Ok(name), Ok(url)) => (name, url),
        (Err(rejection), _) | (_, Err(rejection)) => {
            println!("{rejection}");
            return Ok(EXIT_INVALID_INPUT);
        }
    };

    let mut store = PlaylistStore::open_for_update(store_path)?;
    let replaced = store.upsert(&name, &url);
    store.save()?;
    if replaced {
        println!("Updated saved playlist: {name}");
    } else {
        println!("Saved playlist: {name}");
    }
    log::debug!("playlist store written to {}", store.path().display());
    Ok(EXIT_OK)
}

pub(crate) fn run_remove(store_path: &Path, name: &str) -> Result<u8> {
    let mut store = PlaylistStore::open_for_update(store_path)?;
    if !store.remove(name.trim()) {
        println!("No saved playlist named {}.", name.trim());
        return Ok(EXIT_OK);
    }
    store.save()?;
    println!("Removed saved playlist: {}", name.trim());
    Ok(EXIT_OK)
}
