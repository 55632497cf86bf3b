use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPlaylist {
    pub name: String,
    pub url: String,
}

/// Named playlist URLs kept as one flat JSON object, in insertion order.
pub struct PlaylistStore {
    path: PathBuf,
    playlists: Vec<SavedPlaylist>,
}

impl PlaylistStore {
    /// Read-only view: a missing, unreadable or unparsable store opens empty.
    pub fn open(path: &Path) -> Self {
        let playlists = match read_store(path) {
            Ok(playlists) => playlists,
            Err(err) => {
                log::warn!("ignoring playlist store: {err:#}");
                Vec::new()
            }
        };

        Self {
            path: path.to_path_buf(),
            playlists,
        }
    }

    /// Opens the store for a change that will be written back. An existing file
    /// that cannot be read or parsed is an error so it never gets overwritten.
    pub fn open_for_update(path: &Path) -> Result<Self> {
        let playlists = read_store(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            playlists,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn playlists(&self) -> &[SavedPlaylist] {
        &self.playlists
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    /// Returns true when an existing name was overwritten.
    pub fn upsert(&mut self, name: &str, url: &str) -> bool {
        if let Some(existing) = self.playlists.iter_mut().find(|item| item.name == name) {
            existing.url = url.to_string();
            return true;
        }
        self.playlists.push(SavedPlaylist {
            name: name.to_string(),
            url: url.to_string(),
        });
        false
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.playlists.len();
        self.playlists.retain(|item| item.name != name);
        self.playlists.len() != before
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create playlist store directory {}", parent.display())
            })?;
        }

        let mut object = Map::new();
        for item in &self.playlists {
            object.insert(item.name.clone(), Value::String(item.url.clone()));
        }
        let raw = serde_json::to_string_pretty(&Value::Object(object))?;
        fs::write(&self.path, format!("{raw}\n"))
            .with_context(|| format!("failed to write playlist store at {}", self.path.display()))?;
        Ok(())
    }
}

fn read_store(path: &Path) -> Result<Vec<SavedPlaylist>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read playlist store at {}", path.display()))?;
    let Some((playlists, dropped)) = parse_store(&raw) else {
        bail!(
            "playlist store at {} is not a JSON object of names to URLs",
            path.display()
        );
    };
    if dropped > 0 {
        log::debug!(
            "dropped {dropped} non-string value(s) from {}",
            path.display()
        );
    }
    Ok(playlists)
}

/// Keeps only string values of a top-level object. `None` when the text is not such an object.
pub fn parse_store(raw: &str) -> Option<(Vec<SavedPlaylist>, usize)> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;

    let mut dropped = 0;
    let playlists: Vec<SavedPlaylist> = object
        .iter()
        .filter_map(|(name, url)| match url.as_str() {
            Some(url) => Some(SavedPlaylist {
                name: name.clone(),
                url: url.to_string(),
            }),
            None => {
                dropped += 1;
                None
            }
        })
        .collect();
    Some((playlists, dropped))
}

#[cfg(test)]
pub(crate) struct TempStoreDir {
    path: PathBuf,
}

#[cfg(test)]
impl TempStoreDir {
    pub(crate) fn new(tag: &str) -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let path = std::env::temp_dir().join(format!(
            "watchtill-{tag}-{}-{ts}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("create temp store dir");
        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn store_path(&self) -> PathBuf {
        self.path.join("nested").join("playlists.json")
    }
}

#[cfg(test)]
impl Drop for TempStoreDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_store_keeps_only_string_values_in_order() {
        let raw = r#"{"zeta": "https://z", "count": 3, "alpha": "https://a", "list": ["x"]}"#;
        let (playlists, dropped) = parse_store(raw).expect("object should parse");
        assert_eq!(dropped, 2);
        let names: Vec<&str> = playlists.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(playlists[1].url, "https://a");
    }

    #[test]
    fn parse_store_rejects_non_object_documents() {
        assert!(parse_store("[1, 2]").is_none());
        assert!(parse_store("not json").is_none());
        assert!(parse_store("\"text\"").is_none());
    }

    #[test]
    fn missing_store_opens_empty() {
        let dir = TempStoreDir::new("missing");
        let store = PlaylistStore::open(&dir.store_path());
        assert!(store.is_empty());
    }

    #[test]
    fn unparsable_store_opens_empty() {
        let dir = TempStoreDir::new("garbage");
        let path = dir.path().join("playlists.json");
        fs::write(&path, "{ not valid").expect("write garbage");
        let store = PlaylistStore::open(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn save_then_open_round_trips_and_creates_parent() {
        let dir = TempStoreDir::new("roundtrip");
        let path = dir.store_path();

        let mut store = PlaylistStore::open(&path);
        assert!(!store.upsert("lectures", "https://www.youtube.com/playlist?list=PL1"));
        assert!(!store.upsert("music", "https://www.youtube.com/playlist?list=PL2"));
        assert!(store.upsert("lectures", "https://www.youtube.com/playlist?list=PL3"));
        store.save().expect("save should create parent directories");

        let reopened = PlaylistStore::open(&path);
        assert_eq!(
            reopened.playlists(),
            &[
                SavedPlaylist {
                    name: "lectures".to_string(),
                    url: "https://www.youtube.com/playlist?list=PL3".to_string(),
                },
                SavedPlaylist {
                    name: "music".to_string(),
                    url: "https://www.youtube.com/playlist?list=PL2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn remove_reports_whether_name_existed() {
        let dir = TempStoreDir::new("remove");
        let mut store = PlaylistStore::open(&dir.store_path());
        store.upsert("a", "https://a");
        assert!(store.remove("a"));
        assert!(!store.remove("a"));
        assert!(store.is_empty());
    }

    #[test]
    fn update_refuses_a_store_it_cannot_parse_and_leaves_it_alone() {
        let dir = TempStoreDir::new("strict");
        let path = dir.path().join("playlists.json");
        let broken = concat!(
            r#"{"lectures": "https://www.youtube.com/playlist?list=PL1", "#,
            r#""music": "https://www.youtube.com/playlist?list=PL2",}"#
        );
        fs::write(&path, broken).expect("write store with trailing comma");

        let err = PlaylistStore::open_for_update(&path)
            .err()
            .expect("a store that does not parse must not be opened for writing");
        assert!(err.to_string().contains("not a JSON object"));
        assert_eq!(
            fs::read_to_string(&path).expect("store still readable"),
            broken
        );

        assert!(PlaylistStore::open(&path).is_empty());
    }

    #[test]
    fn update_of_missing_store_starts_empty() {
        let dir = TempStoreDir::new("strict-missing");
        let store =
            PlaylistStore::open_for_update(&dir.store_path()).expect("missing store is fine");
        assert!(store.is_empty());
    }

    #[test]
    fn update_keeps_existing_entries() {
        let dir = TempStoreDir::new("strict-keep");
        let path = dir.path().join("playlists.json");
        fs::write(&path, r#"{"lectures": "https://a", "junk": 1}"#).expect("write store");

        let mut store = PlaylistStore::open_for_update(&path).expect("valid store opens");
        store.upsert("music", "https://b");
        store.save().expect("save");

        let names: Vec<String> = PlaylistStore::open(&path)
            .playlists()
            .iter()
            .map(|item| item.name.clone())
            .collect();
        assert_eq!(names, vec!["lectures", "music"]);
    }
}
