use crate::html::ANCHOR_SELECTOR;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use std::collections::HashSet;
use url::{Origin, Url};

/// URLs at or above this length are never crawled
pub const MAX_URL_LENGTH: usize = 200;

/// Asset and document extensions that are not crawlable HTML pages
static SKIP_EXTENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(pdf|jpg|jpeg|png|gif|svg|webp|avif|zip|css|js|woff2?|ico|xml|json)$")
        .expect("skip extension pattern should be valid")
});

/// Discovers same-origin crawl targets in a homepage document
pub struct LinkExtractor {
    seed: String,
    origin: Origin,
    origin_root: Url,
}

impl LinkExtractor {
    /// The seed is `base_url` without its fragment, serialized the same way
    /// as every discovered link so `https://a.com` and `/` collapse to one target
    pub fn new(base_url: &Url) -> Self {
        let mut seed = base_url.clone();
        seed.set_fragment(None);

        let mut origin_root = base_url.clone();
        origin_root.set_path("/");
        origin_root.set_query(None);
        origin_root.set_fragment(None);

        Self {
            seed: seed.to_string(),
            origin: base_url.origin(),
            origin_root,
        }
    }

    /// Returns the unique crawl targets in discovery order, always starting with the seed
    pub fn extract(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);

        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        seen.insert(self.seed.clone());
        targets.push(self.seed.clone());

        for element in document.select(&ANCHOR_SELECTOR) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            if let Some(target) = self.normalize(href)
                && seen.insert(target.clone())
            {
                targets.push(target);
            }
        }

        targets
    }

    /// Resolves one href to a crawl target, or None when it must be skipped
    pub fn normalize(&self, href: &str) -> Option<String> {
        if href.is_empty() || href.starts_with("mailto:") || href.starts_with("tel:") {
            return None;
        }

        let mut absolute = match self.origin_root.join(href) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(href = %href, error = %e, "Skipping unresolvable link");
                return None;
            }
        };
        absolute.set_fragment(None);
        absolute.set_query(None);

        if !self.is_crawlable(&absolute) {
            return None;
        }

        Some(absolute.to_string())
    }

    fn is_crawlable(&self, url: &Url) -> bool {
        let as_str = url.as_str();
        url.origin() == self.origin
            && !SKIP_EXTENSION.is_match(as_str)
            && as_str.len() < MAX_URL_LENGTH
    }
}
