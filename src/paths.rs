use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub fn playlist_store_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(path) = store_path_from_env(env::var_os("WATCHTILL_PLAYLISTS")) {
        return Ok(path);
    }
    let base = dirs::data_dir().context("unable to resolve data directory")?;
    Ok(base.join("watchtill").join("playlists.json"))
}

pub fn store_path_from_env(env_value: Option<OsString>) -> Option<PathBuf> {
    match env_value {
        Some(value) if !value.is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flag_wins_over_everything() {
        let path = playlist_store_path(Some(PathBuf::from("/tmp/custom.json")))
            .expect("flag path should be returned as-is");
        assert_eq!(path, PathBuf::from("/tmp/custom.json"));
    }

    #[test]
    fn empty_env_value_is_ignored() {
        assert_eq!(store_path_from_env(Some(OsString::new())), None);
        assert_eq!(store_path_from_env(None), None);
        assert_eq!(
            store_path_from_env(Some(OsString::from("/data/lists.json"))),
            Some(PathBuf::from("/data/lists.json"))
        );
    }
}
