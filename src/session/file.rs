//! Session store persisted as a small JSON key/value file

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Session, SessionStore, TOKEN_KEY};
use crate::error::AppResult;

/// Persists the token under the `token` key of a JSON object.
///
/// Other keys in the file are preserved. The file is read on every `get`, so
/// a token written by another process is picked up on the next call.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> AppResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(entries)?)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<Session> {
        match self.read_entries() {
            Ok(mut entries) => entries.remove(TOKEN_KEY).map(Session::new),
            Err(e) => {
                tracing::warn!("Unreadable session file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn set(&self, token: &str) -> AppResult<()> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_entries(&entries)
    }

    fn clear(&self) -> AppResult<()> {
        // A corrupt file cannot hold a usable token; it is removed below
        let mut entries = self.read_entries().unwrap_or_default();
        if entries.remove(TOKEN_KEY).is_none() && !entries.is_empty() {
            return Ok(());
        }
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        self.write_entries(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_survives_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        FileSessionStore::new(&path).set("abc").unwrap();
        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.get().unwrap().token(), "abc");
    }

    #[test]
    fn test_clear_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"theme":"dark","token":"abc"}"#).unwrap();

        let store = FileSessionStore::new(&path);
        store.clear().unwrap();
        store.clear().unwrap();

        assert!(store.get().is_none());
        let remaining: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(remaining.get("theme").map(String::as_str), Some("dark"));
    }

    #[test]
    fn test_clear_missing_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("absent.json"));
        assert!(store.clear().is_ok());
        assert!(store.get().is_none());
    }

    #[test]
    fn test_corrupt_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(store.get().is_none());
        store.set("fresh").unwrap();
        assert_eq!(store.get().unwrap().token(), "fresh");
    }
}
