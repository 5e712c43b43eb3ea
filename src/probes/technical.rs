use crate::http_client::build_http_client;
use crate::models::{RedirectChain, RedirectHop, RobotsCheck, SitemapCheck, TechnicalReport};
use crate::robots::RobotsTxt;
use anyhow::Result;
use reqwest::{Client, StatusCode, header};
use std::time::Instant;
use url::Url;

const SITEMAP_CANDIDATES: [&str; 3] = ["/sitemap.xml", "/sitemap_index.xml", "/sitemap/"];
const ROBOTS_PREVIEW_CHARS: usize = 400;
const MAX_REDIRECT_HOPS: usize = 8;

/// Site-level technical SEO checks: sitemap, robots.txt, TTFB and redirect chain
pub struct TechnicalProbe {
    /// Short timeout client for sitemap and robots.txt lookups
    lookup_client: Client,
    ttfb_client: Client,
    /// Never follows redirects, so every hop can be recorded
    hop_client: Client,
}

impl TechnicalProbe {
    pub fn new() -> Result<Self> {
        Ok(Self {
            lookup_client: build_http_client(6, 5)?,
            ttfb_client: build_http_client(15, 5)?,
            hop_client: build_http_client(5, 0)?,
        })
    }

    /// Runs every check concurrently; each one falls back independently
    pub async fn run(&self, url: &Url) -> TechnicalReport {
        let (sitemap, robots, ttfb, redirects) = tokio::join!(
            self.check_sitemap(url),
            self.check_robots(url),
            self.measure_ttfb(url),
            self.redirect_chain(url),
        );

        TechnicalReport {
            sitemap,
            robots,
            ttfb,
            redirects,
        }
    }

    async fn check_sitemap(&self, base: &Url) -> SitemapCheck {
        for candidate in SITEMAP_CANDIDATES {
            let Ok(sitemap_url) = base.join(candidate) else {
                continue;
            };
            match self.lookup_client.head(sitemap_url.as_str()).send().await {
                Ok(response) if response.status() == StatusCode::OK => {
                    return SitemapCheck {
                        found: true,
                        url: Some(sitemap_url.to_string()),
                    };
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(url = %sitemap_url, error = %e, "Sitemap candidate unreachable");
                }
            }
        }
        SitemapCheck::default()
    }

    async fn check_robots(&self, base: &Url) -> RobotsCheck {
        let Ok(robots_url) = base.join("/robots.txt") else {
            return RobotsCheck::default();
        };

        let response = match self.lookup_client.get(robots_url.as_str()).send().await {
            Ok(response) if response.status() == StatusCode::OK => response,
            Ok(response) => {
                tracing::info!(url = %robots_url, status = %response.status(), "robots.txt not found");
                return RobotsCheck::default();
            }
            Err(e) => {
                tracing::warn!(url = %robots_url, error = %e, "robots.txt check failed");
                return RobotsCheck::default();
            }
        };

        match response.text().await {
            Ok(text) => robots_check(&text),
            Err(e) => {
                tracing::warn!(url = %robots_url, error = %e, "Failed to read robots.txt");
                RobotsCheck::default()
            }
        }
    }

    /// Milliseconds until the response headers arrive; the body is never read
    async fn measure_ttfb(&self, url: &Url) -> Option<u64> {
        let start = Instant::now();
        match self.ttfb_client.get(url.as_str()).send().await {
            Ok(_response) => Some(start.elapsed().as_millis() as u64),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "TTFB measurement failed");
                None
            }
        }
    }

    async fn redirect_chain(&self, url: &Url) -> RedirectChain {
        let mut chain = Vec::new();
        let mut current = url.clone();

        for _ in 0..MAX_REDIRECT_HOPS {
            let response = match self.hop_client.get(current.as_str()).send().await {
                Ok(response) => response,
                Err(e) => {
                    tracing::debug!(url = %current, error = %e, "Redirect chain interrupted");
                    break;
                }
            };

            let status = response.status();
            chain.push(RedirectHop {
                url: current.to_string(),
                status: status.as_u16(),
            });

            let next = status
                .is_redirection()
                .then(|| response.headers().get(header::LOCATION))
                .flatten()
                .and_then(|location| location.to_str().ok())
                .and_then(|location| current.join(location).ok());

            match next {
                Some(next) => current = next,
                None => break,
            }
        }

        RedirectChain {
            count: chain.len().saturating_sub(1),
            chain,
        }
    }
}

/// Summarizes a robots.txt body for the `*` user agent
pub fn robots_check(text: &str) -> RobotsCheck {
    let robots = RobotsTxt::parse(text);

    RobotsCheck {
        found: true,
        disallow_all: robots.disallows_all("*"),
        sitemap_url: robots.sitemaps().first().cloned(),
        preview: Some(text.chars().take(ROBOTS_PREVIEW_CHARS).collect()),
    }
}
