use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "watchtill",
    version,
    about = "Work out how far into a YouTube playlist a time budget gets you"
)]
pub struct Cli {
    /// Saved playlist store (defaults to the user data directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Plan a watch session (default)
    Plan(PlanArgs),
    /// Show saved playlists
    List,
    /// Save a playlist under a name
    Save { name: String, url: String },
    /// Forget a saved playlist
    Remove { name: String },
}

#[derive(Debug, Default, Args)]
pub struct PlanArgs {
    /// Playlist URL; skips the saved playlist menu
    #[arg(long)]
    pub url: Option<String>,

    /// Minutes you want to watch
    #[arg(long)]
    pub minutes: Option<String>,

    /// Starting video number with an optional mm:ss offset, e.g. "7 4:57"
    #[arg(long)]
    pub start: Option<String>,

    /// How saved playlists are offered before asking for a URL
    #[arg(long, value_enum, default_value_t = SavedPlaylistMode::Direct)]
    pub saved_playlists: SavedPlaylistMode,

    /// Print the report without bold emphasis
    #[arg(long)]
    pub plain: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SavedPlaylistMode {
    /// Ask "Use a saved playlist? (y/n)" first
    Ask,
    /// Jump straight to the saved playlist menu
    #[default]
    Direct,
}
