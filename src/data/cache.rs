//! Keeps loaded tables around so switching filters or re-opening the same
//! file never re-parses it.
//!
//! Entries are keyed by the resolved absolute-ish path (after the basename
//! fallback in [`loader::resolve_path`]), so `data/welfare_2015.csv` and a
//! bare `welfare_2015.csv` that resolves to the same file share one entry.
//! Tables are handed out as `Arc` clones; a reload swaps the entry without
//! disturbing anyone still holding the previous snapshot.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::loader::{self, LoadError};
use super::model::Table;

#[derive(Debug, Default)]
pub struct TableCache {
    entries: BTreeMap<PathBuf, Arc<Table>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached table for `path`, loading it on the first request.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Table>, LoadError> {
        let resolved = loader::resolve_path(path)?;
        if let Some(table) = self.entries.get(&resolved) {
            log::debug!("cache hit for {}", resolved.display());
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(loader::load_table(&resolved)?);
        self.entries.insert(resolved, Arc::clone(&table));
        Ok(table)
    }

    /// Re-reads `path` from disk, replacing any cached entry.
    pub fn reload(&mut self, path: &Path) -> Result<Arc<Table>, LoadError> {
        let resolved = loader::resolve_path(path)?;
        let table = Arc::new(loader::load_table(&resolved)?);
        self.entries.insert(resolved, Arc::clone(&table));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
