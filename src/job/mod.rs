//! Durable scrape job state
//!
//! A job records where a crawl stands: the query, the page cursor, the status,
//! and a snapshot item count. It is checkpointed to the blob store after every
//! page so the next invocation can reconstruct exactly where the previous one
//! left off from durable state alone.

mod status;
mod store;

pub use status::JobStatus;
pub use store::JobStore;

use crate::{Result, ScrapeError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Durable record of one scrape job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Opaque job identifier (derived from site + query, or caller-supplied)
    pub id: String,

    /// Target query/category this job scrapes
    pub query: String,

    /// Next listing page index to fetch, 1-based. Monotonic within a crawl;
    /// only an explicit reset rewinds it.
    pub cursor: u32,

    /// Current lifecycle status
    pub status: JobStatus,

    /// Item count snapshot taken at the last checkpoint
    pub items_discovered: u64,

    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,

    /// Populated when the job failed
    pub error: Option<String>,
}

impl Job {
    /// Creates a fresh pending job
    pub fn new(id: impl Into<String>, query: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            query: query.into(),
            cursor: 1,
            status: JobStatus::Pending,
            items_discovered: 0,
            created_at: now,
            last_updated_at: now,
            error: None,
        }
    }

    /// Moves the job to a new status, enforcing the transition matrix
    pub fn transition(&mut self, to: JobStatus) -> Result<()> {
        if !self.status.can_transition(to) {
            return Err(ScrapeError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.last_updated_at = Utc::now();
        Ok(())
    }

    /// Advances the cursor after a page was fully processed and merged.
    /// The cursor never moves backwards.
    pub fn advance_cursor(&mut self, next_page: u32) {
        self.cursor = self.cursor.max(next_page);
        self.last_updated_at = Utc::now();
    }

    /// Records a fatal error on the job
    pub fn fail(&mut self, message: impl Into<String>) -> Result<()> {
        self.error = Some(message.into());
        self.transition(JobStatus::Failed)
    }
}

/// Derives a stable job id from the site name and query
///
/// The id is the first 12 hex characters of sha256("site:query"), short
/// enough for keys and log lines but stable across invocations.
pub fn derive_job_id(site: &str, query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(site.as_bytes());
    hasher.update(b":");
    hasher.update(query.as_bytes());
    hex::encode(hasher.finalize())[..12].to_string()
}
