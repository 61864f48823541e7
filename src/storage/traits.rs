//! Blob store trait and error types

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Blob store error: {0}")]
    Backend(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Key/value blob storage with PUT/GET semantics
///
/// This is the persistence collaborator: job state and result collections are
/// written through it, with keys namespaced per job. A `put` must be atomic
/// from a reader's perspective; a reader never observes a half-written blob.
pub trait BlobStore: Send + Sync {
    /// Writes a blob, replacing any existing value under the key
    fn put(&self, key: &str, bytes: &[u8]) -> StorageResult<()>;

    /// Reads a blob, or None when the key does not exist
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;
}

/// Builds the namespaced key for a blob belonging to a job
pub fn job_key(prefix: &str, job_id: &str, leaf: &str) -> String {
    if prefix.is_empty() {
        format!("jobs/{}/{}", job_id, leaf)
    } else {
        format!("{}/jobs/{}/{}", prefix.trim_end_matches('/'), job_id, leaf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_key_without_prefix() {
        assert_eq!(job_key("", "abc", "state.json"), "jobs/abc/state.json");
    }

    #[test]
    fn test_job_key_with_prefix() {
        assert_eq!(
            job_key("vinted", "abc", "results.json"),
            "vinted/jobs/abc/results.json"
        );
        assert_eq!(
            job_key("vinted/", "abc", "results.json"),
            "vinted/jobs/abc/results.json"
        );
    }
}
