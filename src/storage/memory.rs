//! In-memory blob store, used in tests and local dry runs

use crate::storage::traits::{BlobStore, StorageResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// Blob store holding everything in a process-local map
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, key: &str, bytes: &[u8]) -> StorageResult<()> {
        self.blobs
            .lock()
            .expect("blob map poisoned")
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        Ok(self
            .blobs
            .lock()
            .expect("blob map poisoned")
            .get(key)
            .cloned())
    }
}
