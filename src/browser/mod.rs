//! Browser session management
//!
//! This module owns the headless browser for the duration of one invocation.
//! The driver is a capability interface (navigate + rendered content) so the
//! pagination logic can run against a fixture browser in tests without a
//! Chrome process.

mod chrome;

pub use chrome::ChromeSession;

use crate::Result;
use async_trait::async_trait;

/// A rendered listing page. Ephemeral: lives only within one pagination step.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Final URL after any redirects
    pub url: String,

    /// Rendered DOM serialized to HTML
    pub html: String,
}

/// Capability interface over a headless browser
///
/// Implementations load a URL, wait until the content-ready condition is met,
/// and hand back the rendered DOM. Process lifecycle stays with the concrete
/// session type; consumers only see navigation.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Loads `url` and blocks until an element matching `ready` is present,
    /// or fails with `ScrapeError::NavigationTimeout`.
    async fn navigate(&self, url: &str, ready: &str) -> Result<RenderedPage>;
}
