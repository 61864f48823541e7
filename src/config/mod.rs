//! Configuration module for Feedhound
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files describing the target site, its listing-page selectors, the headless
//! browser, crawl limits, and the blob store location.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, LimitConfig, SelectorConfig, SiteConfig, StorageConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

impl Config {
    /// Builds the listing page URL for a query at a given page index
    pub fn listing_url(&self, query: &str, page: u32) -> String {
        self.site
            .listing_url_template
            .replace("{query}", query)
            .replace("{page}", &page.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{BrowserConfig, LimitConfig, SelectorConfig, SiteConfig, StorageConfig};

    #[test]
    fn test_listing_url_substitution() {
        let config = Config {
            site: SiteConfig {
                name: "vinted".to_string(),
                home_url: "https://www.vinted.cz/".to_string(),
                listing_url_template: "https://www.vinted.cz/catalog/{query}?page={page}"
                    .to_string(),
                categories: vec!["zeny".to_string()],
                user_agent: None,
                dismiss_selectors: vec![],
            },
            selectors: SelectorConfig {
                item_container: "div".to_string(),
                item_link: "a".to_string(),
                item_title: None,
                item_price: None,
                next_page: "a.next".to_string(),
                ready_marker: "div".to_string(),
            },
            browser: BrowserConfig::default(),
            limits: LimitConfig::default(),
            storage: StorageConfig {
                root: "./data".to_string(),
                key_prefix: String::new(),
            },
        };

        assert_eq!(
            config.listing_url("zeny", 3),
            "https://www.vinted.cz/catalog/zeny?page=3"
        );
    }
}
