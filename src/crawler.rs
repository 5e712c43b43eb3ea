use crate::aggregator::summarize_issues;
use crate::duplicates::flag_duplicate_titles;
use crate::error::CrawlError;
use crate::http_client::build_http_client;
use crate::link_extractor::LinkExtractor;
use crate::models::CrawlReport;
use crate::page_analyzer::PageAnalyzer;
use crate::scheduler::{BatchScheduler, DEFAULT_BATCH_SIZE};
use crate::scoring::overall_health_score;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use url::Url;

/// Redirects followed when fetching the homepage
pub const HOMEPAGE_MAX_REDIRECTS: usize = 5;

/// Configuration for the crawler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlerConfig {
    /// Crawl targets beyond this many are truncated, not rejected
    pub max_pages: usize,
    pub batch_size: usize,
    pub page_timeout_secs: u64,
    pub homepage_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 25,
            batch_size: DEFAULT_BATCH_SIZE,
            page_timeout_secs: 12,
            homepage_timeout_secs: 15,
        }
    }
}

pub struct Crawler {
    homepage_client: reqwest::Client,
    analyzer: Arc<PageAnalyzer>,
    scheduler: BatchScheduler,
    max_pages: usize,
    progress_bar: Option<ProgressBar>,
}

impl Crawler {
    pub fn new(config: CrawlerConfig) -> Result<Self, CrawlError> {
        let homepage_client =
            build_http_client(config.homepage_timeout_secs, HOMEPAGE_MAX_REDIRECTS)
                .map_err(|e| CrawlError::Client(e.to_string()))?;
        let analyzer = PageAnalyzer::new(config.page_timeout_secs)
            .map_err(|e| CrawlError::Client(e.to_string()))?;

        Ok(Self {
            homepage_client,
            analyzer: Arc::new(analyzer),
            scheduler: BatchScheduler::new(config.batch_size),
            max_pages: config.max_pages.max(1),
            progress_bar: None,
        })
    }

    /// Enable progress bar for crawling
    pub fn enable_progress_bar(&mut self) {
        let pb = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:30.cyan/blue} {pos}/{len} pages")
        {
            pb.set_style(style);
        }
        self.progress_bar = Some(pb);
    }

    /// Crawls the site rooted at `url` and builds its health report.
    ///
    /// Only an unreachable homepage fails the crawl; every page-level problem
    /// is reported as issues inside the returned report.
    pub async fn crawl_site(&self, url: &str) -> Result<CrawlReport, CrawlError> {
        let base_url = Url::parse(url)?;
        match base_url.scheme() {
            "http" | "https" => {}
            scheme => return Err(CrawlError::UnsupportedScheme(scheme.to_string())),
        }

        let homepage = self.fetch_homepage(url).await?;

        let mut targets = LinkExtractor::new(&base_url).extract(&homepage);
        if targets.len() > self.max_pages {
            tracing::info!(
                discovered = targets.len(),
                max_pages = self.max_pages,
                "Truncating crawl targets"
            );
            targets.truncate(self.max_pages);
        }

        if let Some(ref pb) = self.progress_bar {
            pb.set_length(targets.len() as u64);
            pb.set_position(0);
        }

        let analyzer = Arc::clone(&self.analyzer);
        let outcome = self
            .scheduler
            .run(
                &targets,
                move |target| {
                    let analyzer = Arc::clone(&analyzer);
                    async move { analyzer.analyze(&target).await }
                },
                self.progress_bar.as_ref(),
            )
            .await;

        if let Some(ref pb) = self.progress_bar {
            pb.finish_with_message(format!("Checked {} pages", outcome.pages.len()));
        }

        let mut pages = outcome.pages;
        let duplicate_titles = flag_duplicate_titles(&mut pages);
        let issues = summarize_issues(&pages);
        let overall_health_score = overall_health_score(&pages);

        tracing::info!(
            url = %url,
            pages = pages.len(),
            dropped = outcome.dropped,
            health = overall_health_score,
            "Crawl complete"
        );

        Ok(CrawlReport {
            pages_checked: pages.len(),
            pages,
            issues,
            duplicate_titles,
            overall_health_score,
        })
    }

    async fn fetch_homepage(&self, url: &str) -> Result<String, CrawlError> {
        self.request_homepage(url).await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Cannot fetch homepage");
            CrawlError::HomepageUnreachable(e.to_string())
        })
    }

    async fn request_homepage(&self, url: &str) -> reqwest::Result<String> {
        self.homepage_client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

/// Crawls `url` with the default configuration
pub async fn crawl_site(url: &str) -> Result<CrawlReport, CrawlError> {
    Crawler::new(CrawlerConfig::default())?.crawl_site(url).await
}
