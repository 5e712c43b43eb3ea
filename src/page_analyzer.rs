use crate::html::{
    CANONICAL_SELECTOR, CRAWL_STRIPPED_TAGS, H1_SELECTOR, IMG_SELECTOR, META_DESC_SELECTOR,
    TITLE_SELECTOR, count_words, element_text, select_content, visible_text,
};
use crate::http_client::build_http_client;
use crate::models::{Issue, IssueType, PageResult, Severity};
use crate::scoring::page_health_score;
use anyhow::Result;
use reqwest::Client;
use scraper::Html;
use std::time::Instant;

/// Redirects followed when fetching a crawled page
pub const PAGE_MAX_REDIRECTS: usize = 3;
/// Pages with fewer words than this are flagged as thin
pub const THIN_CONTENT_WORDS: usize = 300;

/// On-page signals extracted from one HTML document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSignals {
    pub title: String,
    pub meta_description: String,
    pub h1_tags: Vec<String>,
    pub canonical: Option<String>,
    pub word_count: usize,
    pub image_count: usize,
    pub images_missing_alt: usize,
    pub images_missing_size: usize,
    pub modern_format_images: usize,
}

impl PageSignals {
    pub fn extract(document: &Html) -> Self {
        let stripped = CRAWL_STRIPPED_TAGS;

        let title = select_content(document, &TITLE_SELECTOR, stripped)
            .next()
            .map(|el| element_text(&el))
            .unwrap_or_default();

        let meta_description = select_content(document, &META_DESC_SELECTOR, stripped)
            .next()
            .and_then(|el| el.value().attr("content"))
            .unwrap_or_default()
            .to_string();

        let h1_tags = select_content(document, &H1_SELECTOR, stripped)
            .map(|el| element_text(&el))
            .collect();

        let canonical = select_content(document, &CANONICAL_SELECTOR, stripped)
            .next()
            .and_then(|el| el.value().attr("href"))
            .filter(|href| !href.is_empty())
            .map(|href| href.to_string());

        let mut signals = Self {
            title,
            meta_description,
            h1_tags,
            canonical,
            word_count: count_words(&visible_text(document, stripped)),
            ..Self::default()
        };

        for img in select_content(document, &IMG_SELECTOR, stripped) {
            let attrs = img.value();
            signals.image_count += 1;
            if attrs.attr("alt").is_none() {
                signals.images_missing_alt += 1;
            }
            if attrs.attr("width").is_none() && attrs.attr("height").is_none() {
                signals.images_missing_size += 1;
            }
            if attrs
                .attr("src")
                .is_some_and(|src| src.contains(".webp") || src.contains(".avif"))
            {
                signals.modern_format_images += 1;
            }
        }

        signals
    }

    /// Evaluates every on-page rule in a fixed order; several may fire
    pub fn issues(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        let h1_count = self.h1_tags.len();

        if self.title.is_empty() {
            issues.push(Issue::new(
                IssueType::MissingTitle,
                Severity::Critical,
                "Missing page title",
            ));
        }
        if self.meta_description.is_empty() {
            issues.push(Issue::new(
                IssueType::MissingMeta,
                Severity::Warning,
                "Missing meta description",
            ));
        }
        if h1_count == 0 {
            issues.push(Issue::new(
                IssueType::MissingH1,
                Severity::Critical,
                "Missing H1 tag",
            ));
        }
        if h1_count > 1 {
            issues.push(Issue::new(
                IssueType::MultipleH1,
                Severity::Warning,
                format!("Multiple H1 tags ({})", h1_count),
            ));
        }
        if self.word_count < THIN_CONTENT_WORDS {
            issues.push(Issue::new(
                IssueType::ThinContent,
                Severity::Warning,
                format!("Thin content ({} words)", self.word_count),
            ));
        }
        if self.canonical.is_none() {
            issues.push(Issue::new(
                IssueType::MissingCanonical,
                Severity::Info,
                "Missing canonical tag",
            ));
        }
        if self.images_missing_alt > 0 {
            let plural = if self.images_missing_alt > 1 { "s" } else { "" };
            issues.push(Issue::new(
                IssueType::ImgNoAlt,
                Severity::Warning,
                format!("{} image{} missing alt text", self.images_missing_alt, plural),
            ));
        }
        if self.image_count > 0 && self.modern_format_images == 0 {
            issues.push(Issue::new(
                IssueType::ImgFormat,
                Severity::Info,
                "No WebP/AVIF images detected",
            ));
        }
        if self.images_missing_size > 2 {
            issues.push(Issue::new(
                IssueType::ImgNoSize,
                Severity::Info,
                format!(
                    "{} images missing width/height (layout shift risk)",
                    self.images_missing_size
                ),
            ));
        }

        issues
    }
}

/// Fetches and scores individual pages. Never fails: errors become page results.
pub struct PageAnalyzer {
    client: Client,
}

impl PageAnalyzer {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout_secs, PAGE_MAX_REDIRECTS)?,
        })
    }

    pub async fn analyze(&self, url: &str) -> PageResult {
        let start = Instant::now();

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Page fetch failed");
                return Self::fetch_error(url, &e.to_string(), elapsed_ms(start));
            }
        };

        let status = response.status().as_u16();
        if status >= 400 {
            return Self::broken_page(url, status, elapsed_ms(start));
        }

        match response.text().await {
            Ok(body) => Self::analyze_document(url, status, elapsed_ms(start), &body),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to read page body");
                Self::fetch_error(url, &e.to_string(), elapsed_ms(start))
            }
        }
    }

    /// Builds the result for a successfully fetched HTML body
    pub fn analyze_document(url: &str, status: u16, load_time: u64, html: &str) -> PageResult {
        let document = Html::parse_document(html);
        let signals = PageSignals::extract(&document);
        let issues = signals.issues();

        PageResult {
            url: url.to_string(),
            status,
            load_time,
            health_score: page_health_score(&issues),
            h1_count: signals.h1_tags.len(),
            word_count: signals.word_count,
            title: signals.title,
            meta_description: signals.meta_description,
            canonical: signals.canonical,
            issues,
        }
    }

    /// Result for a response with status >= 400; the body is never parsed
    pub fn broken_page(url: &str, status: u16, load_time: u64) -> PageResult {
        PageResult::failed(
            url,
            status,
            load_time,
            Issue::new(
                IssueType::BrokenPage,
                Severity::Critical,
                format!("HTTP {}", status),
            ),
        )
    }

    /// Result for a request that failed before any response arrived
    pub fn fetch_error(url: &str, message: &str, load_time: u64) -> PageResult {
        PageResult::failed(
            url,
            0,
            load_time,
            Issue::new(IssueType::FetchError, Severity::Critical, message),
        )
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
