use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Mapping from workspace directory name to DCP problem number, persisted
/// as a flat JSON object. The file is the sole source of truth; nothing is
/// cached across invocations.
#[derive(Debug, Default)]
pub struct TrackingStore {
    problems: BTreeMap<String, u32>,
}

impl TrackingStore {
    /// Load the store from `path`. A missing file is an empty store;
    /// unreadable or corrupt JSON is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let problems = serde_json::from_str(&contents).map_err(|source| Error::Tracking {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { problems })
    }

    /// Save the whole store: written to a temp file next to the target,
    /// then renamed over it, so a crash never leaves a truncated file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let tmp = NamedTempFile::new_in(parent)?;
        serde_json::to_writer_pretty(tmp.as_file(), &self.problems).map_err(io::Error::from)?;
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Record a number for a directory. A prior entry for the same
    /// directory is overwritten (last write wins).
    pub fn add(&mut self, directory: impl Into<String>, number: u32) {
        self.problems.insert(directory.into(), number);
    }

    pub fn get(&self, directory: &str) -> Option<u32> {
        self.problems.get(directory).copied()
    }

    /// Directories from `known` that have no entry in the store.
    pub fn untracked<'a, I>(&self, known: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        known
            .into_iter()
            .filter(|directory| !self.problems.contains_key(*directory))
            .map(String::from)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = TrackingStore::load(&tmp.path().join("problem_tracking.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("problem_tracking.json");

        let mut store = TrackingStore::load(&path).unwrap();
        store.add("2024_0315", 42);
        store.save(&path).unwrap();

        let reloaded = TrackingStore::load(&path).unwrap();
        assert_eq!(reloaded.get("2024_0315"), Some(42));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_add_overwrites_existing_entry() {
        let mut store = TrackingStore::default();
        store.add("2024_0315", 42);
        store.add("2024_0315", 387);
        assert_eq!(store.get("2024_0315"), Some(387));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_untracked() {
        let mut store = TrackingStore::default();
        store.add("2024_0315", 42);

        let untracked = store.untracked(["2024_0301", "2024_0315"]);
        assert_eq!(untracked.len(), 1);
        assert!(untracked.contains("2024_0301"));
    }

    #[test]
    fn test_untracked_empty_when_all_known() {
        let mut store = TrackingStore::default();
        store.add("2024_0301", 1);
        store.add("2024_0315", 2);
        assert!(store.untracked(["2024_0301", "2024_0315"]).is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("problem_tracking.json");
        fs::write(&path, "invalid json {").unwrap();

        let err = TrackingStore::load(&path).unwrap_err();
        assert!(matches!(err, Error::Tracking { .. }));
    }

    #[test]
    fn test_save_replaces_previous_contents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("problem_tracking.json");

        let mut store = TrackingStore::default();
        store.add("2023_1204", 387);
        store.add("2024_0315", 42);
        store.save(&path).unwrap();

        let mut smaller = TrackingStore::default();
        smaller.add("2024_0315", 42);
        smaller.save(&path).unwrap();

        let reloaded = TrackingStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get("2023_1204"), None);
    }

    #[test]
    fn test_saved_file_is_a_flat_json_object() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("problem_tracking.json");

        let mut store = TrackingStore::default();
        store.add("2024_0315", 42);
        store.save(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["2024_0315"], 42);
    }
}
