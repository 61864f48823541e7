//! Chrome-backed browser session
//!
//! Launches one headless Chrome process per invocation over CDP, with a
//! bounded startup timeout, and guarantees the process and its temp profile
//! are released on close. The flags mirror what constrained single-CPU
//! container environments need to run Chrome at all.

use crate::browser::{BrowserDriver, RenderedPage};
use crate::config::{BrowserConfig, SiteConfig};
use crate::{Result, ScrapeError};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};

/// Fallback user agents when none is configured
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
];

/// A single headless Chrome process scoped to one invocation
pub struct ChromeSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Page,
    profile_dir: PathBuf,
    nav_timeout: Duration,
}

impl ChromeSession {
    /// Launches headless Chrome, visits the site home page, and clicks any
    /// configured consent/region banners
    ///
    /// Startup is bounded by `startup-timeout-secs`; exceeding it yields
    /// `ScrapeError::BrowserStartup`.
    pub async fn open(site: &SiteConfig, config: &BrowserConfig) -> Result<Self> {
        let profile_dir = std::env::temp_dir().join(format!(
            "feedhound-profile-{}-{}",
            std::process::id(),
            fastrand::u32(..)
        ));

        let mut builder = CdpConfig::builder()
            .no_sandbox()
            .user_data_dir(&profile_dir)
            .args(vec![
                "--disable-gpu",
                "--disable-dev-shm-usage",
                "--disable-dev-tools",
                "--single-process",
                "--no-zygote",
                "--window-size=1280x1696",
            ]);

        if let Some(binary) = &config.binary_path {
            builder = builder.chrome_executable(Path::new(binary));
        }
        for arg in &config.extra_args {
            builder = builder.arg(arg.as_str());
        }

        let cdp_config = builder
            .build()
            .map_err(ScrapeError::BrowserStartup)?;

        let startup = Duration::from_secs(config.startup_timeout_secs);
        let (browser, mut handler) = match timeout(startup, Browser::launch(cdp_config)).await {
            Ok(Ok(launched)) => launched,
            Ok(Err(e)) => {
                remove_profile_dir(&profile_dir);
                return Err(ScrapeError::BrowserStartup(e.to_string()));
            }
            Err(_) => {
                remove_profile_dir(&profile_dir);
                return Err(ScrapeError::BrowserStartup(format!(
                    "browser did not become ready within {:?}",
                    startup
                )));
            }
        };

        // Drive CDP events in the background for the lifetime of the session
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                shutdown_browser(browser, handler_task, &profile_dir).await;
                return Err(ScrapeError::BrowserStartup(e.to_string()));
            }
        };

        let user_agent = site
            .user_agent
            .clone()
            .unwrap_or_else(|| USER_AGENTS[fastrand::usize(..USER_AGENTS.len())].to_string());
        if let Err(e) = page.set_user_agent(user_agent.as_str()).await {
            shutdown_browser(browser, handler_task, &profile_dir).await;
            return Err(ScrapeError::Browser(e.to_string()));
        }

        let session = Self {
            browser,
            handler_task,
            page,
            profile_dir,
            nav_timeout: Duration::from_secs(config.navigation_timeout_secs),
        };

        if let Err(e) = session.visit_home(site).await {
            if let Err(close_err) = session.close().await {
                tracing::warn!("Cleanup after failed home visit also failed: {}", close_err);
            }
            return Err(e);
        }

        Ok(session)
    }

    /// Visits the home page once and dismisses consent/region banners
    async fn visit_home(&self, site: &SiteConfig) -> Result<()> {
        tracing::info!("Visiting home page: {}", site.home_url);
        self.page
            .goto(site.home_url.as_str())
            .await
            .map_err(|e| ScrapeError::Browser(e.to_string()))?;
        let _ = self.page.wait_for_navigation().await;

        for selector in &site.dismiss_selectors {
            match self.page.find_element(selector.as_str()).await {
                Ok(element) => {
                    tracing::info!("Dismissing banner matching '{}'", selector);
                    if let Err(e) = element.click().await {
                        tracing::warn!("Failed to click '{}': {}", selector, e);
                    }
                    // Give the overlay time to close before the next click
                    sleep(Duration::from_millis(500)).await;
                }
                Err(_) => {
                    tracing::debug!("No banner matching '{}'", selector);
                }
            }
        }

        Ok(())
    }

    /// Shuts down the browser process and removes the temp profile
    ///
    /// Must run on every exit path; a leaked Chrome process exhausts the
    /// memory ceiling of environments that reuse the execution sandbox.
    pub async fn close(self) -> Result<()> {
        let Self {
            browser,
            handler_task,
            profile_dir,
            ..
        } = self;
        shutdown_browser(browser, handler_task, &profile_dir).await;
        tracing::debug!("Browser session closed");
        Ok(())
    }
}

/// Tears down a launched browser and its surroundings
async fn shutdown_browser(mut browser: Browser, handler_task: JoinHandle<()>, profile_dir: &Path) {
    if let Err(e) = browser.close().await {
        tracing::warn!("Browser close failed: {}", e);
    }
    if let Err(e) = browser.wait().await {
        tracing::warn!("Browser did not exit cleanly: {}", e);
    }
    handler_task.abort();
    remove_profile_dir(profile_dir);
}

/// Best-effort removal of the per-session profile directory
fn remove_profile_dir(profile_dir: &Path) {
    if !profile_dir.exists() {
        return;
    }
    if let Err(e) = std::fs::remove_dir_all(profile_dir) {
        tracing::warn!(
            "Failed to remove profile dir {}: {}",
            profile_dir.display(),
            e
        );
    }
}

#[async_trait]
impl BrowserDriver for ChromeSession {
    async fn navigate(&self, url: &str, ready: &str) -> Result<RenderedPage> {
        tracing::debug!("Navigating to {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| ScrapeError::Browser(e.to_string()))?;
        let _ = self.page.wait_for_navigation().await;

        // Poll for the content-ready marker until the navigation deadline
        let deadline = Instant::now() + self.nav_timeout;
        loop {
            if self.page.find_element(ready).await.is_ok() {
                break;
            }
            if Instant::now() >= deadline {
                return Err(ScrapeError::NavigationTimeout {
                    url: url.to_string(),
                });
            }
            sleep(Duration::from_millis(100)).await;
        }

        let html = self
            .page
            .content()
            .await
            .map_err(|e| ScrapeError::Browser(e.to_string()))?;
        let final_url = self
            .page
            .url()
            .await
            .map_err(|e| ScrapeError::Browser(e.to_string()))?
            .unwrap_or_else(|| url.to_string());

        Ok(RenderedPage {
            url: final_url,
            html,
        })
    }
}
