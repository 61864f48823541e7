use crate::config::types::{Config, LimitConfig, SelectorConfig, SiteConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site(&config.site)?;
    validate_selectors(&config.selectors)?;
    validate_limits(&config.limits)?;

    if config.storage.root.is_empty() {
        return Err(ConfigError::Validation(
            "storage root cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates site configuration
fn validate_site(site: &SiteConfig) -> Result<(), ConfigError> {
    if site.name.is_empty() {
        return Err(ConfigError::Validation(
            "site name cannot be empty".to_string(),
        ));
    }

    Url::parse(&site.home_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid home-url: {}", e)))?;

    if !site.listing_url_template.contains("{query}") {
        return Err(ConfigError::Validation(
            "listing-url-template must contain a {query} placeholder".to_string(),
        ));
    }

    if !site.listing_url_template.contains("{page}") {
        return Err(ConfigError::Validation(
            "listing-url-template must contain a {page} placeholder".to_string(),
        ));
    }

    if site.categories.is_empty() {
        return Err(ConfigError::Validation(
            "at least one category must be configured".to_string(),
        ));
    }

    for selector in &site.dismiss_selectors {
        validate_selector(selector, "dismiss-selectors")?;
    }

    Ok(())
}

/// Validates that all configured selectors parse under the CSS grammar
fn validate_selectors(selectors: &SelectorConfig) -> Result<(), ConfigError> {
    validate_selector(&selectors.item_container, "item-container")?;
    validate_selector(&selectors.item_link, "item-link")?;
    validate_selector(&selectors.next_page, "next-page")?;
    validate_selector(&selectors.ready_marker, "ready-marker")?;

    if let Some(title) = &selectors.item_title {
        validate_selector(title, "item-title")?;
    }
    if let Some(price) = &selectors.item_price {
        validate_selector(price, "item-price")?;
    }

    Ok(())
}

fn validate_selector(selector: &str, field: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("{}: '{}' ({:?})", field, selector, e)))?;
    Ok(())
}

/// Validates crawl limits and the time budget
fn validate_limits(limits: &LimitConfig) -> Result<(), ConfigError> {
    if limits.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            limits.max_pages
        )));
    }

    if limits.max_items < 1 {
        return Err(ConfigError::Validation(format!(
            "max-items must be >= 1, got {}",
            limits.max_items
        )));
    }

    if limits.time_budget_secs == 0 {
        return Err(ConfigError::Validation(
            "time-budget-secs must be > 0".to_string(),
        ));
    }

    if limits.budget_margin_secs >= limits.time_budget_secs {
        return Err(ConfigError::Validation(format!(
            "budget-margin-secs ({}) must be smaller than time-budget-secs ({})",
            limits.budget_margin_secs, limits.time_budget_secs
        )));
    }

    if limits.page_delay_min_ms > limits.page_delay_max_ms {
        return Err(ConfigError::Validation(format!(
            "page-delay-min-ms ({}) must not exceed page-delay-max-ms ({})",
            limits.page_delay_min_ms, limits.page_delay_max_ms
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{BrowserConfig, StorageConfig};

    fn valid_config() -> Config {
        Config {
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
                item_container: "div.feed-grid__item".to_string(),
                item_link: "a[href]".to_string(),
                item_title: None,
                item_price: None,
                next_page: "a.next".to_string(),
                ready_marker: "div.feed-grid__item".to_string(),
            },
            browser: BrowserConfig::default(),
            limits: LimitConfig::default(),
            storage: StorageConfig {
                root: "./data".to_string(),
                key_prefix: String::new(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_page_placeholder_rejected() {
        let mut config = valid_config();
        config.site.listing_url_template = "https://example.com/{query}".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_missing_query_placeholder_rejected() {
        let mut config = valid_config();
        config.site.listing_url_template = "https://example.com/?page={page}".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_home_url_rejected() {
        let mut config = valid_config();
        config.site.home_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_broken_selector_rejected() {
        let mut config = valid_config();
        config.selectors.item_container = "div[".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_empty_categories_rejected() {
        let mut config = valid_config();
        config.site.categories.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_margin_must_be_smaller_than_budget() {
        let mut config = valid_config();
        config.limits.time_budget_secs = 60;
        config.limits.budget_margin_secs = 60;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_inverted_page_delay_rejected() {
        let mut config = valid_config();
        config.limits.page_delay_min_ms = 500;
        config.limits.page_delay_max_ms = 100;
        assert!(validate(&config).is_err());
    }
}
