//! Storage of fragment records between acquisition and scoring.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::record::FragmentRecord;

/// A collection of fragment records addressed by key.
///
/// `keys` is the store's natural listing order; the aggregator sorts it by
/// [`FragmentStore::name_of`] when a deterministic order is requested.
pub trait FragmentStore {
    fn keys(&self) -> Result<Vec<String>>;
    fn load(&self, key: &str) -> Result<FragmentRecord>;

    /// Site name of the record stored under `key`, available without loading
    /// the record. Stores that key records by name return `key` unchanged.
    fn name_of(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Maps a site name to the key (file stem) its record is stored under.
///
/// Path separators and `%` are percent-escaped, so [`name_for`] recovers the
/// exact name.
pub fn key_for(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '%' => key.push_str("%25"),
            '/' => key.push_str("%2F"),
            '\\' => key.push_str("%5C"),
            c => key.push(c),
        }
    }
    key
}

/// Inverse of [`key_for`]. Unknown escapes are kept as written.
pub fn name_for(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    let mut rest = key;

    while let Some(pos) = rest.find('%') {
        name.push_str(&rest[..pos]);
        let escaped = &rest[pos..];
        let (c, len) = match escaped.get(..3) {
            Some("%25") => ('%', 3),
            Some("%2F") => ('/', 3),
            Some("%5C") => ('\\', 3),
            _ => ('%', 1),
        };
        name.push(c);
        rest = &escaped[len..];
    }
    name.push_str(rest);

    name
}

/// One pretty-printed JSON file per site inside a directory.
///
/// Entries without a `.json` extension are ignored, so the results table can
/// live in the same directory.
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Opens `dir`, creating it if it does not exist yet.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create store directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Writes `record`, replacing any earlier record for the same site.
    pub fn save(&self, record: &FragmentRecord) -> Result<PathBuf> {
        let path = self.path_for(&key_for(&record.name));
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        debug!(
            path = %path.display(),
            fragments = record.fragment_count(),
            "Stored fragment record"
        );
        Ok(path)
    }
}

impl FragmentStore for DirectoryStore {
    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("failed to list {}", self.dir.display()))?;

        for entry in entries {
            let entry = entry?;
            let path = entry.path();

            let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
            if !entry.file_type()?.is_file() || !is_json {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }

        Ok(keys)
    }

    fn load(&self, key: &str) -> Result<FragmentRecord> {
        let path = self.path_for(key);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let record = serde_json::from_str(&content)
            .with_context(|| format!("invalid fragment record {}", path.display()))?;
        Ok(record)
    }

    fn name_of(&self, key: &str) -> String {
        name_for(key)
    }
}

/// Records held in memory, listed in insertion order and keyed by name.
#[derive(Default)]
pub struct MemoryStore {
    records: Vec<FragmentRecord>,
}

impl MemoryStore {
    pub fn new(records: Vec<FragmentRecord>) -> Self {
        Self { records }
    }
}

impl FragmentStore for MemoryStore {
    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.records.iter().map(|r| r.name.clone()).collect())
    }

    fn load(&self, key: &str) -> Result<FragmentRecord> {
        self.records
            .iter()
            .find(|r| r.name == key)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no record stored for '{}'", key))
    }
}
