//! Storage module for persisting crawl data
//!
//! Persistence goes through a key/value blob store collaborator with PUT/GET
//! semantics. Job state and result collections are JSON blobs namespaced by
//! job id; backends exist for the local filesystem and for memory.

mod fs;
mod memory;
mod results;
mod traits;

pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;
pub use results::ResultStore;
pub use traits::{job_key, BlobStore, StorageError, StorageResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One discovered marketplace listing
///
/// Identity is the item URL; everything else is a best-effort snapshot taken
/// from the listing card at discovery time. Immutable once written, except
/// that re-discovery may backfill missing snapshot fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemReference {
    /// Canonical item URL, the deduplication key
    pub url: String,

    /// Listing title snapshot
    pub title: Option<String>,

    /// Listing price snapshot, as displayed
    pub price: Option<String>,

    /// When this reference was first extracted
    pub discovered_at: DateTime<Utc>,

    /// Listing page index the reference was first seen on
    pub source_page: u32,
}
