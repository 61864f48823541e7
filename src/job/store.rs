//! Job persistence over the blob store

use crate::job::Job;
use crate::storage::{job_key, BlobStore};
use crate::{Result, ScrapeError};

/// Loads and checkpoints job records
pub struct JobStore<'a> {
    blobs: &'a dyn BlobStore,
    key_prefix: String,
}

impl<'a> JobStore<'a> {
    pub fn new(blobs: &'a dyn BlobStore, key_prefix: impl Into<String>) -> Self {
        Self {
            blobs,
            key_prefix: key_prefix.into(),
        }
    }

    fn key(&self, job_id: &str) -> String {
        job_key(&self.key_prefix, job_id, "state.json")
    }

    /// Loads a job record, or None when the id is unknown
    pub fn load(&self, job_id: &str) -> Result<Option<Job>> {
        match self.blobs.get(&self.key(job_id))? {
            Some(bytes) => {
                let job = serde_json::from_slice(&bytes)
                    .map_err(|e| ScrapeError::Persistence(format!("corrupt job state: {}", e)))?;
                Ok(Some(job))
            }
            None => Ok(None),
        }
    }

    /// Creates a job or resumes the existing one; idempotent
    ///
    /// A non-terminal job is returned as-is so the caller can continue from
    /// its checkpointed cursor. A terminal job is returned untouched unless
    /// `reset` is set, in which case a fresh record replaces it.
    pub fn create_or_resume(&self, job_id: &str, query: &str, reset: bool) -> Result<Job> {
        match self.load(job_id)? {
            Some(existing) if existing.status.is_terminal() && !reset => {
                tracing::info!(
                    "Job {} is already {} and no reset was requested",
                    job_id,
                    existing.status
                );
                Ok(existing)
            }
            Some(existing) if !reset => {
                tracing::info!(
                    "Resuming job {} at page {} ({} items so far)",
                    job_id,
                    existing.cursor,
                    existing.items_discovered
                );
                Ok(existing)
            }
            _ => {
                if reset {
                    tracing::info!("Resetting job {}", job_id);
                }
                let mut job = Job::new(job_id, query);
                self.checkpoint(&mut job)?;
                Ok(job)
            }
        }
    }

    /// Persists the full job record
    ///
    /// Atomic from a reader's perspective: a status check never observes a
    /// half-written cursor/status pair. Persist failure is fatal for the
    /// invocation; progress that cannot be recorded must not be reported as
    /// success.
    pub fn checkpoint(&self, job: &mut Job) -> Result<()> {
        job.last_updated_at = chrono::Utc::now();
        let bytes = serde_json::to_vec_pretty(job)
            .map_err(|e| ScrapeError::Persistence(e.to_string()))?;
        self.blobs
            .put(&self.key(&job.id), &bytes)
            .map_err(|e| ScrapeError::Persistence(e.to_string()))?;
        tracing::debug!(
            "Checkpointed job {}: {} at page {}",
            job.id,
            job.status,
            job.cursor
        );
        Ok(())
    }
}
