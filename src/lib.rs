//! Feedhound: a resumable marketplace listing scraper
//!
//! This crate drives a headless browser through paginated marketplace listing
//! pages, extracts item URLs, and checkpoints progress to a blob store so a
//! crawl can be split across invocations under a hard wall-clock budget.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod handlers;
pub mod job;
pub mod storage;

use thiserror::Error;

/// Main error type for Feedhound operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser failed to start: {0}")]
    BrowserStartup(String),

    #[error("Navigation timed out for {url}")]
    NavigationTimeout { url: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Failed to persist progress: {0}")]
    Persistence(String),

    #[error("Job not found: {job_id}")]
    JobNotFound { job_id: String },

    #[error("Invalid status transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: job::JobStatus,
        to: job::JobStatus,
    },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector in config: {0}")]
    InvalidSelector(String),
}

/// Result type alias for Feedhound operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Paginator, StopReason, TimeBudget};
pub use job::{Job, JobStatus, JobStore};
pub use storage::{BlobStore, ItemReference, ResultStore};
