//! Durable, deduplicated result collections
//!
//! Discovered item references are kept per job as a set keyed by canonical
//! URL, in first-seen order. Merging is idempotent and commutative: merging
//! overlapping batches in any order yields the same final set.

use crate::storage::traits::{job_key, BlobStore, StorageError, StorageResult};
use crate::storage::ItemReference;
use std::collections::HashMap;

/// Append/merge store for discovered item references
pub struct ResultStore<'a> {
    blobs: &'a dyn BlobStore,
    key_prefix: String,
}

impl<'a> ResultStore<'a> {
    pub fn new(blobs: &'a dyn BlobStore, key_prefix: impl Into<String>) -> Self {
        Self {
            blobs,
            key_prefix: key_prefix.into(),
        }
    }

    fn key(&self, job_id: &str) -> String {
        job_key(&self.key_prefix, job_id, "results.json")
    }

    /// Merges a batch of references into the job's collection
    ///
    /// Re-discovered URLs are not duplicated; they only backfill snapshot
    /// fields (title/price) that were missing on the first sighting.
    ///
    /// Returns the number of references that were actually new.
    pub fn merge(&self, job_id: &str, references: &[ItemReference]) -> StorageResult<usize> {
        let mut collection = self.list(job_id)?;
        let mut index: HashMap<String, usize> = collection
            .iter()
            .enumerate()
            .map(|(i, r)| (r.url.clone(), i))
            .collect();

        let mut added = 0;
        for reference in references {
            match index.get(&reference.url) {
                Some(&i) => {
                    let existing = &mut collection[i];
                    if existing.title.is_none() {
                        existing.title = reference.title.clone();
                    }
                    if existing.price.is_none() {
                        existing.price = reference.price.clone();
                    }
                }
                None => {
                    index.insert(reference.url.clone(), collection.len());
                    collection.push(reference.clone());
                    added += 1;
                }
            }
        }

        let bytes = serde_json::to_vec(&collection)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.blobs.put(&self.key(job_id), &bytes)?;

        Ok(added)
    }

    /// Drops the job's collection, used by explicit job reset
    pub fn clear(&self, job_id: &str) -> StorageResult<()> {
        self.blobs.put(&self.key(job_id), b"[]")?;
        Ok(())
    }

    /// Returns the deduplicated collection in discovery order
    pub fn list(&self, job_id: &str) -> StorageResult<Vec<ItemReference>> {
        match self.blobs.get(&self.key(job_id))? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StorageError::Serialization(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    /// Number of references discovered so far for a job
    pub fn count(&self, job_id: &str) -> StorageResult<u64> {
        Ok(self.list(job_id)?.len() as u64)
    }
}
