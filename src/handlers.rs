//! Entry point handlers
//!
//! Three thin entry points mirror the deployed invocation surface: `index`
//! lists the scrapeable targets, `status` reads a job's checkpointed state,
//! and `scrape` runs the crawl engine for one invocation. Handlers translate
//! parameters into operations on the core and never hold state themselves.

use crate::browser::{BrowserDriver, ChromeSession};
use crate::config::Config;
use crate::crawler::{ListingExtractor, Paginator, StopReason, TimeBudget};
use crate::job::{derive_job_id, JobStatus, JobStore};
use crate::storage::{BlobStore, ResultStore};
use crate::{Result, ScrapeError};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One scrapeable target, as listed by the index handler
#[derive(Debug, Clone, Serialize)]
pub struct JobTarget {
    pub category: String,
    pub job_id: String,
    pub starting_url: String,
}

/// Read-only view of a job's last checkpointed state
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub job_id: String,
    pub query: String,
    pub status: JobStatus,
    pub cursor: u32,
    pub items_discovered: u64,
    pub error: Option<String>,
    pub last_updated_at: DateTime<Utc>,
}

/// Result of one scrape invocation
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeOutcome {
    pub job_id: String,
    pub status: JobStatus,
    pub items_discovered: u64,
    pub resume_available: bool,
}

/// Parameters of a scrape invocation
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    /// Category/query to scrape; must be one of the configured categories
    pub query: String,

    /// Caller-supplied job id; derived from site + query when absent
    pub job_id: Option<String>,

    /// Discard any previous state for this job and start over
    pub reset: bool,
}

/// Lists the job targets this deployment can scrape. Side-effect free.
pub fn index(config: &Config) -> Vec<JobTarget> {
    config
        .site
        .categories
        .iter()
        .map(|category| JobTarget {
            category: category.clone(),
            job_id: derive_job_id(&config.site.name, category),
            starting_url: config.listing_url(category, 1),
        })
        .collect()
}

/// Reports the last successfully checkpointed state of a job
///
/// Unknown ids are an error, never a crafted empty job: callers must be able
/// to distinguish "no such job" from "job that found nothing".
pub fn status(config: &Config, blobs: &dyn BlobStore, job_id: &str) -> Result<StatusReport> {
    let jobs = JobStore::new(blobs, config.storage.key_prefix.clone());
    let job = jobs
        .load(job_id)?
        .ok_or_else(|| ScrapeError::JobNotFound {
            job_id: job_id.to_string(),
        })?;

    Ok(StatusReport {
        job_id: job.id,
        query: job.query,
        status: job.status,
        cursor: job.cursor,
        items_discovered: job.items_discovered,
        error: job.error,
        last_updated_at: job.last_updated_at,
    })
}

/// Runs one scrape invocation end to end
///
/// Resolves the job, launches the browser session, drives the paginator, and
/// releases the browser on every exit path. A terminal job with no reset flag
/// is reported without launching a browser at all.
pub async fn scrape(
    config: &Config,
    blobs: &dyn BlobStore,
    request: &ScrapeRequest,
) -> Result<ScrapeOutcome> {
    let (job_id, query) = resolve_job(config, request)?;

    // Cheap pre-check so a finished job does not pay for a Chrome launch
    let jobs = JobStore::new(blobs, config.storage.key_prefix.clone());
    if !request.reset {
        if let Some(existing) = jobs.load(&job_id)? {
            if existing.status.is_terminal() {
                tracing::info!("Job {} already {}", job_id, existing.status);
                return Ok(outcome_of(&existing));
            }
        }
    }

    // The budget clock starts before the browser does: startup and the
    // home-page visit count against the invocation ceiling
    let budget = TimeBudget::from_limits(&config.limits);
    let session = ChromeSession::open(&config.site, &config.browser).await?;
    let result = scrape_with_browser(&session, config, blobs, &job_id, &query, request.reset, budget).await;

    // Scoped release on success and error alike; a leaked browser process
    // poisons every later invocation in the same execution environment
    if let Err(e) = session.close().await {
        tracing::warn!("Browser session cleanup failed: {}", e);
    }

    result
}

/// Scrape core against any browser driver
///
/// This is the seam the tests use: the paginator only sees the capability
/// interface, so a fixture browser can stand in for Chrome.
pub async fn scrape_with_browser(
    browser: &dyn BrowserDriver,
    config: &Config,
    blobs: &dyn BlobStore,
    job_id: &str,
    query: &str,
    reset: bool,
    budget: TimeBudget,
) -> Result<ScrapeOutcome> {
    let jobs = JobStore::new(blobs, config.storage.key_prefix.clone());
    let results = ResultStore::new(blobs, config.storage.key_prefix.clone());

    if reset {
        results.clear(job_id)?;
    }

    let mut job = jobs.create_or_resume(job_id, query, reset)?;
    if job.status.is_terminal() {
        return Ok(outcome_of(&job));
    }

    let extractor = ListingExtractor::new(&config.selectors)?;
    let paginator = Paginator::new(browser, &extractor, &jobs, &results, config, budget);
    let reason = paginator.run(&mut job).await?;

    match reason {
        StopReason::TimeBudgetReached => {
            tracing::info!("Job {} out of budget, resume token is the job id", job.id)
        }
        StopReason::FatalError => {
            tracing::error!("Job {} failed: {:?}", job.id, job.error)
        }
        _ => {}
    }

    Ok(outcome_of(&job))
}

fn resolve_job(config: &Config, request: &ScrapeRequest) -> Result<(String, String)> {
    if !config.site.categories.contains(&request.query) {
        return Err(ScrapeError::UnknownCategory(request.query.clone()));
    }

    let job_id = request
        .job_id
        .clone()
        .unwrap_or_else(|| derive_job_id(&config.site.name, &request.query));

    Ok((job_id, request.query.clone()))
}

fn outcome_of(job: &crate::job::Job) -> ScrapeOutcome {
    ScrapeOutcome {
        job_id: job.id.clone(),
        status: job.status,
        items_discovered: job.items_discovered,
        resume_available: job.status == JobStatus::Incomplete,
    }
}
