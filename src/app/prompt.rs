use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};

use crate::cli::SavedPlaylistMode;
use crate::store::{PlaylistStore, SavedPlaylist};

use super::input::{
    ValidationError, parse_menu_choice, parse_playlist_url, parse_start_position,
    parse_watch_minutes, parse_yes_no,
};

/// Console front end. Every question is repeated until the answer parses;
/// closed input is the only way out of a loop.
pub(crate) struct Prompter<R, W> {
    input: R,
    output: W,
    mode: SavedPlaylistMode,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub(crate) fn new(input: R, output: W, mode: SavedPlaylistMode) -> Self {
        Self {
            input,
            output,
            mode,
        }
    }

    pub(crate) fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}").context("failed to write to terminal")
    }

    fn read_answer(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}").context("failed to write prompt")?;
        self.output.flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read answer")?;
        if read == 0 {
            bail!("input closed before a valid answer was given");
        }
        Ok(line.trim().to_string())
    }

    fn ask<T, F>(&mut self, question: &str, mut parse: F) -> Result<T>
    where
        F: FnMut(&str) -> Result<T, ValidationError>,
    {
        loop {
            let answer = self.read_answer(question)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(rejection) => self.say(&rejection.to_string())?,
            }
        }
    }

    pub(crate) fn playlist_url(&mut self, store: &PlaylistStore) -> Result<String> {
        if store.is_empty() {
            return self.manual_playlist_url();
        }

        match self.mode {
            SavedPlaylistMode::Ask => {
                let use_saved = self.ask("\nUse a saved playlist? (y/n): ", parse_yes_no)?;
                if use_saved {
                    self.select_saved(store.playlists())
                } else {
                    self.manual_playlist_url()
                }
            }
            SavedPlaylistMode::Direct => self.select_saved(store.playlists()),
        }
    }

    fn manual_playlist_url(&mut self) -> Result<String> {
        self.ask("\nEnter the YouTube playlist URL: ", parse_playlist_url)
    }

    fn select_saved(&mut self, playlists: &[SavedPlaylist]) -> Result<String> {
        self.say("\nAvailable saved playlists:")?;
        for (idx, item) in playlists.iter().enumerate() {
            self.say(&format!("{} - {}", idx + 1, item.name))?;
        }
        let picked = self.ask("\nSelect playlist: ", |raw| {
            parse_menu_choice(raw, playlists.len())
        })?;
        Ok(playlists[picked].url.clone())
    }

    /// Budget in seconds.
    pub(crate) fn watch_budget(&mut self) -> Result<u64> {
        self.ask(
            "\nEnter the number of minutes you want to watch: ",
            parse_watch_minutes,
        )
    }

    pub(crate) fn start_position(&mut self, max_index: usize) -> Result<(usize, u64)> {
        let question = format!(
            "Enter the starting video number (max -> {max_index}) [optional timestamp mm:ss]: "
        );
        self.ask(&question, |raw| parse_start_position(raw, max_index))
    }

    #[cfg(test)]
    pub(crate) fn into_output(self) -> W {
        self.output
    }
}
