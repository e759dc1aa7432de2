//! Explicit memoization of loaded datasets.
//!
//! The dashboard re-aggregates on every selection change; re-reading and
//! re-parsing the file each time would be wasted work. The cache is a plain
//! value owned by whoever constructs it and lives as long as its owner.
//! There is no expiry and no change detection: an edited source file is
//! only picked up by a new cache.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::app::pipeline::{SourceConfig, load_dataset};
use crate::domain::{ColumnNames, Dataset};
use crate::error::AppError;
use crate::io::ingest::LoadOptions;

type CacheKey = (PathBuf, LoadOptions, ColumnNames);

#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<CacheKey, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the dataset for `source`, loading and normalizing it on first use.
    pub fn get_or_load(&mut self, source: &SourceConfig) -> Result<Arc<Dataset>, AppError> {
        let key = (canonical_path(source), source.options, source.columns.clone());
        if let Some(ds) = self.entries.get(&key) {
            log::debug!("Dataset cache hit for '{}'", key.0.display());
            return Ok(Arc::clone(ds));
        }

        let ds = Arc::new(load_dataset(source)?);
        self.entries.insert(key, Arc::clone(&ds));
        Ok(ds)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn canonical_path(source: &SourceConfig) -> PathBuf {
    // Canonicalize so `./a.csv` and `a.csv` share an entry; a path that cannot
    // be canonicalized will fail to load anyway.
    std::fs::canonicalize(&source.path).unwrap_or_else(|_| source.path.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::TextEncoding;

    const CSV: &str = "Order ID,Order Date,Ship Date,Category,Sales,Profit\nA1,2023-01-05,2023-01-08,Tech,100,20\n";

    #[test]
    fn second_lookup_is_a_hit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut cache = DatasetCache::new();
        let a = cache.get_or_load(&SourceConfig::new(&path)).unwrap();

        // Changing the file does not invalidate the entry.
        std::fs::write(&path, "garbage").unwrap();
        let b = cache
            .get_or_load(&SourceConfig::new(dir.path().join(".").join("sales.csv")))
            .unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn different_load_options_are_separate_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut cache = DatasetCache::new();
        let mut latin = SourceConfig::new(&path);
        latin.options.primary = TextEncoding::Latin1;

        cache.get_or_load(&SourceConfig::new(&path)).unwrap();
        cache.get_or_load(&latin).unwrap();
        assert_eq!(cache.len(), 2);
    }
}
