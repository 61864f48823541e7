use serde::Deserialize;

/// Main configuration structure for Feedhound
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub limits: LimitConfig,
    pub storage: StorageConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Short site name used in keys and job ids (e.g. "vinted")
    pub name: String,

    /// Home page visited once after browser startup
    #[serde(rename = "home-url")]
    pub home_url: String,

    /// Listing page URL template with `{query}` and `{page}` placeholders
    #[serde(rename = "listing-url-template")]
    pub listing_url_template: String,

    /// Categories/queries that may be scraped
    pub categories: Vec<String>,

    /// User agent sent by the browser; a built-in one is used when absent
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,

    /// Selectors for consent/region banners clicked once after startup
    #[serde(rename = "dismiss-selectors", default)]
    pub dismiss_selectors: Vec<String>,
}

/// Structural selectors for listing pages
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    /// Container element for one listing card
    #[serde(rename = "item-container")]
    pub item_container: String,

    /// Anchor inside the container that links to the item
    #[serde(rename = "item-link")]
    pub item_link: String,

    /// Optional title element inside the container
    #[serde(rename = "item-title")]
    pub item_title: Option<String>,

    /// Optional price element inside the container
    #[serde(rename = "item-price")]
    pub item_price: Option<String>,

    /// Enabled "next page" control
    #[serde(rename = "next-page")]
    pub next_page: String,

    /// Element whose presence means the listing content has rendered
    #[serde(rename = "ready-marker")]
    pub ready_marker: String,
}

/// Headless browser configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Path to the Chrome/Chromium binary; auto-detected when absent
    #[serde(rename = "binary-path")]
    pub binary_path: Option<String>,

    /// Bounded startup timeout; generous because constrained environments
    /// can take a long time to fork and warm up Chrome
    #[serde(rename = "startup-timeout-secs", default = "default_startup_timeout")]
    pub startup_timeout_secs: u64,

    /// Per-navigation timeout waiting for the ready marker
    #[serde(rename = "navigation-timeout-secs", default = "default_nav_timeout")]
    pub navigation_timeout_secs: u64,

    /// Extra Chrome command-line arguments
    #[serde(rename = "extra-args", default)]
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            binary_path: None,
            startup_timeout_secs: default_startup_timeout(),
            navigation_timeout_secs: default_nav_timeout(),
            extra_args: Vec::new(),
        }
    }
}

/// Crawl limits and the invocation time budget
#[derive(Debug, Clone, Deserialize)]
pub struct LimitConfig {
    /// Maximum listing page index crawled per job
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Hard cap on items discovered per job
    #[serde(rename = "max-items", default = "default_max_items")]
    pub max_items: u64,

    /// Wall-clock ceiling for one invocation, in seconds
    #[serde(rename = "time-budget-secs", default = "default_time_budget")]
    pub time_budget_secs: u64,

    /// Time reserved at the end of the budget to checkpoint and shut down
    #[serde(rename = "budget-margin-secs", default = "default_budget_margin")]
    pub budget_margin_secs: u64,

    /// Minimum polite delay between pages, in milliseconds
    #[serde(rename = "page-delay-min-ms", default)]
    pub page_delay_min_ms: u64,

    /// Maximum polite delay between pages, in milliseconds
    #[serde(rename = "page-delay-max-ms", default)]
    pub page_delay_max_ms: u64,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            max_items: default_max_items(),
            time_budget_secs: default_time_budget(),
            budget_margin_secs: default_budget_margin(),
            page_delay_min_ms: 0,
            page_delay_max_ms: 0,
        }
    }
}

/// Blob store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the filesystem blob store
    pub root: String,

    /// Key prefix under which all job blobs are written
    #[serde(rename = "key-prefix", default)]
    pub key_prefix: String,
}

fn default_startup_timeout() -> u64 {
    45
}

fn default_nav_timeout() -> u64 {
    10
}

fn default_max_pages() -> u32 {
    1000
}

fn default_max_items() -> u64 {
    100_000
}

fn default_time_budget() -> u64 {
    840
}

fn default_budget_margin() -> u64 {
    90
}
