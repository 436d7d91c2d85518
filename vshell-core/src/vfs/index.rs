//! Name-to-entry index over the flat archive listing.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::archive::Entry;
use crate::error::{VshError, VshResult};

/// Ordered map from full entry name to its archive entry.
///
/// Directories are not stored: a directory exists when some name has it as
/// a prefix. The ordering lets prefix queries run as range scans.
#[derive(Debug, Clone, Default)]
pub struct VfsIndex {
    entries: BTreeMap<String, Entry>,
}

impl VfsIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from a full enumeration of the archive.
    ///
    /// Rejects duplicate names, and files whose name is also used as a
    /// directory by another entry (`vfs/a` next to `vfs/a/b.txt`).
    pub fn build<I>(entries: I) -> VshResult<Self>
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut index = Self::new();
        for entry in entries {
            if index.entries.contains_key(&entry.name) {
                return Err(VshError::DuplicateEntry(entry.name));
            }
            index.entries.insert(entry.name.clone(), entry);
        }

        for entry in index.entries.values().filter(|e| !e.is_dir) {
            if index.has_prefix(&format!("{}/", entry.name)) {
                return Err(VshError::PathConflict(entry.name.clone()));
            }
        }

        tracing::debug!(entries = index.entries.len(), "built vfs index");
        Ok(index)
    }

    /// Look up an entry by exact name.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Look up a regular file (not an explicit directory record).
    pub fn file(&self, name: &str) -> Option<&Entry> {
        self.get(name).filter(|e| !e.is_dir)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Add a new entry. The name must not be present yet.
    pub fn insert(&mut self, entry: Entry) -> VshResult<()> {
        if self.entries.contains_key(&entry.name) {
            return Err(VshError::DestinationExists(entry.name));
        }
        self.entries.insert(entry.name.clone(), entry);
        Ok(())
    }

    /// True if at least one name starts with `prefix`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.with_prefix(prefix).next().is_some()
    }

    /// Names starting with `prefix`, in lexicographic order.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .map(|(name, _)| name.as_str())
            .take_while(move |name| name.starts_with(prefix))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
