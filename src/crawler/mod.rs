//! Crawl-and-extract engine
//!
//! This module contains the core crawling logic:
//! - Listing page extraction with structural selectors
//! - The pagination state machine with per-page checkpointing
//! - The invocation time budget

mod budget;
mod extractor;
mod paginator;

pub use budget::TimeBudget;
pub use extractor::ListingExtractor;
pub use paginator::{Paginator, StopReason};
