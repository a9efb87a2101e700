//! JSON-file fact store

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use crate::fact::{self, CollectionStats, FactRecord, PREVIEW_CHARS};
use crate::{Error, Result};

/// Read the collection at `path`.
///
/// A missing file is an empty collection. A file that cannot be read or is not
/// a JSON array of records yields [`Error::MalformedStorage`].
pub fn load(path: &Path) -> Result<Vec<FactRecord>> {
    if !path.exists() {
        debug!("No storage at {:?}, starting empty", path);
        return Ok(Vec::new());
    }

    let malformed = |reason: String| Error::MalformedStorage {
        path: path.to_path_buf(),
        reason,
    };

    let contents = std::fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
    let facts: Vec<FactRecord> =
        serde_json::from_str(&contents).map_err(|e| malformed(e.to_string()))?;

    debug!("Loaded {} facts from {:?}", facts.len(), path);
    Ok(facts)
}

/// Serialize `facts` as a pretty JSON array followed by a newline.
///
/// Failures of the underlying writer are [`Error::Persist`].
fn write_facts<W: Write>(mut writer: W, facts: &[FactRecord]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, facts).map_err(|e| {
        if e.is_io() {
            Error::Persist(e.into())
        } else {
            Error::Serialize(e)
        }
    })?;
    writer.write_all(b"\n").map_err(Error::Persist)?;
    writer.flush().map_err(Error::Persist)
}

/// Durable, deduplicated collection of facts
pub struct FactStore {
    path: PathBuf,
    facts: Vec<FactRecord>,
    /// Normalized texts of `facts`; derived, never persisted
    index: HashSet<String>,
}

impl FactStore {
    /// Open the store at `path`.
    ///
    /// Malformed storage is not fatal: a warning is logged, the store starts
    /// empty and the file is left as it is until the next successful insert.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let facts = match load(&path) {
            Ok(facts) => facts,
            Err(e) => {
                warn!("Could not read {}: {}. Starting with empty database.", path.display(), e);
                Vec::new()
            }
        };
        Self::with_facts(path, facts)
    }

    fn with_facts(path: PathBuf, facts: Vec<FactRecord>) -> Self {
        let index = facts.iter().map(FactRecord::normalized).collect();
        Self { path, facts, index }
    }

    /// Whether `candidate` matches a stored fact after trimming and case-folding
    pub fn is_duplicate(&self, candidate: &str) -> bool {
        self.index.contains(&fact::normalize(candidate))
    }

    /// Insert a new fact and persist the collection.
    ///
    /// Blank text is rejected with [`Error::EmptyInput`], text already present
    /// with [`Error::Duplicate`]. If persisting fails the record is removed
    /// again so memory never runs ahead of disk.
    pub fn add(&mut self, candidate: &str) -> Result<FactRecord> {
        let text = candidate.trim();
        if text.is_empty() {
            return Err(Error::EmptyInput);
        }

        if self.is_duplicate(text) {
            return Err(Error::Duplicate {
                preview: fact::preview(text, PREVIEW_CHARS),
            });
        }

        let record = FactRecord::new(self.next_id(), text);
        let key = record.normalized();
        self.facts.push(record.clone());
        self.index.insert(key.clone());

        if let Err(e) = self.persist() {
            self.facts.pop();
            self.index.remove(&key);
            return Err(e);
        }

        info!("New fact added: #{}", record.id);
        Ok(record)
    }

    /// Write the whole collection, replacing the previous file atomically
    pub fn persist(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(Error::Persist)?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(Error::Persist)?;
        write_facts(&mut tmp, &self.facts)?;
        tmp.as_file().sync_all().map_err(Error::Persist)?;
        tmp.persist(&self.path).map_err(|e| Error::Persist(e.error))?;

        info!("Database saved: {} facts stored", self.facts.len());
        Ok(())
    }

    /// Next id: one past the highest id in use
    fn next_id(&self) -> u64 {
        self.facts.iter().map(|f| f.id).max().unwrap_or(0) + 1
    }

    pub fn facts(&self) -> &[FactRecord] {
        &self.facts
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn latest(&self) -> Option<&FactRecord> {
        self.facts.last()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stats(&self) -> CollectionStats {
        CollectionStats::from_facts(&self.facts)
    }
}
