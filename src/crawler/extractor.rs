//! Listing page extraction
//!
//! Applies the configured structural selectors to a rendered listing page and
//! pulls out item references in document order. Site markup drifts; when the
//! expected markers are gone the extractor degrades to an empty result and a
//! warning instead of failing the job.

use crate::browser::RenderedPage;
use crate::config::SelectorConfig;
use crate::storage::ItemReference;
use crate::{ConfigError, ConfigResult};
use chrono::Utc;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts item references and pagination state from listing pages
pub struct ListingExtractor {
    item_container: Selector,
    item_link: Selector,
    item_title: Option<Selector>,
    item_price: Option<Selector>,
    next_page: Selector,
}

impl ListingExtractor {
    pub fn new(config: &SelectorConfig) -> ConfigResult<Self> {
        Ok(Self {
            item_container: parse_selector(&config.item_container)?,
            item_link: parse_selector(&config.item_link)?,
            item_title: config
                .item_title
                .as_deref()
                .map(parse_selector)
                .transpose()?,
            item_price: config
                .item_price
                .as_deref()
                .map(parse_selector)
                .transpose()?,
            next_page: parse_selector(&config.next_page)?,
        })
    }

    /// Extracts item references from a rendered listing page
    ///
    /// One reference per listing card, in document order, deduplicated within
    /// the page. Cards carry two anchors (seller profile first, item overlay
    /// last), so the last matching anchor inside a container is the item link.
    /// Missing structural markers yield an empty result, never an error.
    pub fn extract(&self, page: &RenderedPage, page_index: u32) -> Vec<ItemReference> {
        let document = Html::parse_document(&page.html);
        let base_url = Url::parse(&page.url).ok();

        let containers: Vec<ElementRef> = document.select(&self.item_container).collect();
        if containers.is_empty() {
            tracing::warn!(
                "Extraction mismatch on page {}: no elements match the item container selector",
                page_index
            );
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut references = Vec::new();

        for container in containers {
            let anchor = match container.select(&self.item_link).last() {
                Some(a) => a,
                None => continue,
            };
            let href = match anchor.value().attr("href") {
                Some(h) => h.trim(),
                None => continue,
            };

            let item_url = match resolve_item_url(href, base_url.as_ref()) {
                Some(u) => u,
                None => continue,
            };

            if !seen.insert(item_url.clone()) {
                continue;
            }

            references.push(ItemReference {
                url: item_url,
                title: self.text_of(&container, self.item_title.as_ref()),
                price: self.text_of(&container, self.item_price.as_ref()),
                discovered_at: Utc::now(),
                source_page: page_index,
            });
        }

        if references.is_empty() {
            tracing::warn!(
                "Extraction mismatch on page {}: containers present but no item links found",
                page_index
            );
        } else {
            tracing::info!(
                "Extracted {} item references from page {}",
                references.len(),
                page_index
            );
        }

        references
    }

    /// Inspects pagination controls for an enabled "next" link
    ///
    /// Absence of the control means last page, following the same
    /// graceful-degradation policy as extraction.
    pub fn has_next_page(&self, html: &str) -> bool {
        let document = Html::parse_document(html);
        document.select(&self.next_page).any(|element| {
            element.value().attr("href").is_some() && element.value().attr("disabled").is_none()
        })
    }

    fn text_of(&self, container: &ElementRef, selector: Option<&Selector>) -> Option<String> {
        let selector = selector?;
        container
            .select(selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

fn parse_selector(selector: &str) -> ConfigResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}' ({:?})", selector, e)))
}

/// Resolves an item href to an absolute, fragment-free URL
///
/// The URL is the deduplication key across invocations, so fragments and
/// surrounding whitespace must not produce distinct entries.
fn resolve_item_url(href: &str, base_url: Option<&Url>) -> Option<String> {
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    if href.starts_with("javascript:") || href.starts_with("mailto:") || href.starts_with("data:") {
        return None;
    }

    let mut resolved = match base_url {
        Some(base) => base.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    resolved.set_fragment(None);
    Some(resolved.to_string())
}
