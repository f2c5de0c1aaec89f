//! Resumable result cache.
//!
//! The cache is the output file of a previous run. An item counts as done iff
//! its `defect_img_path` matches a cached entry exactly.
//!
//! Reading (`CacheStore::load`) and writing (`output::JsonOutput`) are separate
//! ports; by default both point at the same file, which is what makes a plain
//! rerun resume where the last one stopped.

pub mod output;

use crate::errors::{PipelineError, PipelineResult};
use crate::model::{CacheEntry, ResolvedItem};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct CacheStore {
    entries: Vec<CacheEntry>,
    keys: HashSet<String>,
}

impl CacheStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<CacheEntry>) -> Self {
        let keys = entries.iter().map(|e| e.defect_img_path.clone()).collect();
        Self { entries, keys }
    }

    /// Load a previous output file. A missing file is an empty cache.
    pub fn load(path: &Path) -> PipelineResult<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no cache file; starting fresh");
            return Ok(Self::empty());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| PipelineError::InputRead {
            what: "cache",
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<CacheEntry> =
            serde_json::from_str(&raw).map_err(|e| PipelineError::InputFormat {
                what: "cache",
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let store = Self::from_entries(entries);
        info!(path = %path.display(), entries = store.len(), "cache loaded");
        Ok(store)
    }

    pub fn entries(&self) -> &[CacheEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Drop every item that already has a cached result, keeping order.
    pub fn filter_uncached(&self, items: Vec<ResolvedItem>) -> Vec<ResolvedItem> {
        if self.keys.is_empty() {
            return items;
        }
        items
            .into_iter()
            .filter(|item| !self.contains(item.key()))
            .collect()
    }
}
