//! Paginator - the central crawl state machine
//!
//! Drives the browser across a sequence of listing pages for one job:
//! `Idle -> Fetching -> Extracting -> (Advancing | Stopping)`, terminal
//! `Stopped{reason}`. Every extracted page is merged and checkpointed before
//! the next transition is evaluated, because the runtime may kill the process
//! at the budget boundary without warning.

use crate::browser::{BrowserDriver, RenderedPage};
use crate::config::Config;
use crate::crawler::budget::TimeBudget;
use crate::crawler::extractor::ListingExtractor;
use crate::job::{Job, JobStatus, JobStore};
use crate::storage::ResultStore;
use crate::{Result, ScrapeError};
use std::time::Duration;
use tokio::time::sleep;

/// Navigation retry bound; a single flaky page load should not fail the job,
/// but a persistently unreachable page must not silently truncate results
const MAX_FETCH_ATTEMPTS: u32 = 3;

/// Base delay between navigation retries
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Why the paginator stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No next-page control on the last extracted page, or the page cap hit
    ExhaustedPages,

    /// The job's item cap was reached
    ItemCapReached,

    /// Remaining budget fell below the shutdown margin
    TimeBudgetReached,

    /// Navigation failed after all retries
    FatalError,
}

impl StopReason {
    /// The job status this stop reason checkpoints as
    pub fn final_status(&self) -> JobStatus {
        match self {
            Self::ExhaustedPages | Self::ItemCapReached => JobStatus::Complete,
            Self::TimeBudgetReached => JobStatus::Incomplete,
            Self::FatalError => JobStatus::Failed,
        }
    }
}

/// Crawl states between pages
enum PaginatorState {
    Idle,
    Fetching,
    Extracting(RenderedPage),
    Advancing { has_next: bool },
    Stopping(StopReason),
}

/// Drives one job across listing pages until a stop condition
pub struct Paginator<'a> {
    browser: &'a dyn BrowserDriver,
    extractor: &'a ListingExtractor,
    jobs: &'a JobStore<'a>,
    results: &'a ResultStore<'a>,
    config: &'a Config,
    budget: TimeBudget,
}

impl<'a> Paginator<'a> {
    pub fn new(
        browser: &'a dyn BrowserDriver,
        extractor: &'a ListingExtractor,
        jobs: &'a JobStore<'a>,
        results: &'a ResultStore<'a>,
        config: &'a Config,
        budget: TimeBudget,
    ) -> Self {
        Self {
            browser,
            extractor,
            jobs,
            results,
            config,
            budget,
        }
    }

    /// Runs the crawl loop for a job until it stops
    ///
    /// The job is checkpointed after every extracted page and once more with
    /// its final status, so a later invocation resumes from the last page
    /// that was fully merged.
    pub async fn run(&self, job: &mut Job) -> Result<StopReason> {
        job.transition(JobStatus::Running)?;
        self.jobs.checkpoint(job)?;

        let mut pages_this_invocation = 0u32;
        let mut state = PaginatorState::Idle;

        loop {
            state = match state {
                PaginatorState::Idle => {
                    // Conservative: check the budget before the first fetch
                    // too, so a resume with no time left stops cleanly
                    if self.budget.can_start_page() {
                        PaginatorState::Fetching
                    } else {
                        PaginatorState::Stopping(StopReason::TimeBudgetReached)
                    }
                }

                PaginatorState::Fetching => {
                    let url = self.config.listing_url(&job.query, job.cursor);
                    tracing::info!("Fetching page {} of job {}: {}", job.cursor, job.id, url);

                    match self.fetch_with_retry(&url).await {
                        Ok(page) => PaginatorState::Extracting(page),
                        Err(e) => {
                            tracing::error!(
                                "Page {} of job {} unreachable after {} attempts: {}",
                                job.cursor,
                                job.id,
                                MAX_FETCH_ATTEMPTS,
                                e
                            );
                            job.fail(format!("page {} unreachable: {}", job.cursor, e))?;
                            self.jobs.checkpoint(job)?;
                            return Ok(StopReason::FatalError);
                        }
                    }
                }

                PaginatorState::Extracting(page) => {
                    let page_index = job.cursor;
                    let references = self.extractor.extract(&page, page_index);
                    let has_next = self.extractor.has_next_page(&page.html);

                    let added = self.results.merge(&job.id, &references)?;
                    job.items_discovered = self.results.count(&job.id)?;
                    job.advance_cursor(page_index + 1);
                    self.jobs.checkpoint(job)?;

                    pages_this_invocation += 1;
                    tracing::info!(
                        "Page {}: {} extracted, {} new, {} total, next page: {}",
                        page_index,
                        references.len(),
                        added,
                        job.items_discovered,
                        has_next
                    );

                    PaginatorState::Advancing { has_next }
                }

                PaginatorState::Advancing { has_next } => {
                    if !has_next {
                        PaginatorState::Stopping(StopReason::ExhaustedPages)
                    } else if job.items_discovered >= self.config.limits.max_items {
                        PaginatorState::Stopping(StopReason::ItemCapReached)
                    } else if job.cursor > self.config.limits.max_pages {
                        tracing::info!(
                            "Page cap {} reached for job {}",
                            self.config.limits.max_pages,
                            job.id
                        );
                        PaginatorState::Stopping(StopReason::ExhaustedPages)
                    } else if !self.budget.can_start_page() {
                        PaginatorState::Stopping(StopReason::TimeBudgetReached)
                    } else {
                        self.polite_delay().await;
                        PaginatorState::Fetching
                    }
                }

                PaginatorState::Stopping(reason) => {
                    job.transition(reason.final_status())?;
                    self.jobs.checkpoint(job)?;
                    tracing::info!(
                        "Job {} stopped after {} page(s): {:?} -> {} ({} items, {:?} elapsed)",
                        job.id,
                        pages_this_invocation,
                        reason,
                        job.status,
                        job.items_discovered,
                        self.budget.elapsed()
                    );
                    return Ok(reason);
                }
            };
        }
    }

    /// Navigates with a bounded retry and short backoff
    async fn fetch_with_retry(&self, url: &str) -> Result<RenderedPage> {
        let ready = &self.config.selectors.ready_marker;
        let mut last_error = None;

        for attempt in 1..=MAX_FETCH_ATTEMPTS {
            match self.browser.navigate(url, ready).await {
                Ok(page) => return Ok(page),
                Err(e) => {
                    tracing::warn!("Attempt {}/{} failed for {}: {}", attempt, MAX_FETCH_ATTEMPTS, url, e);
                    last_error = Some(e);
                    if attempt < MAX_FETCH_ATTEMPTS {
                        sleep(RETRY_BACKOFF * attempt).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ScrapeError::Browser("navigation failed".to_string())))
    }

    /// Jittered delay between pages, skipped when configured to zero
    async fn polite_delay(&self) {
        let min = self.config.limits.page_delay_min_ms;
        let max = self.config.limits.page_delay_max_ms;
        if max == 0 {
            return;
        }
        let millis = if min >= max { min } else { fastrand::u64(min..=max) };
        sleep(Duration::from_millis(millis)).await;
    }
}
