use crate::http_client::build_http_client;
use crate::models::{AuditReport, CompetitorFailure, CompetitorReport, CompetitorResult};
use crate::probes::domain_age::DEFAULT_RDAP_ENDPOINT;
use crate::probes::keywords::{DEFAULT_SERP_ENDPOINT, average_rank};
use crate::probes::pagespeed::DEFAULT_PAGESPEED_ENDPOINT;
use crate::probes::{
    PageSpeedClient, RdapClient, SerpClient, TechnicalProbe, fetch_content, fetch_security,
};
use crate::scoring::{
    AuthorityInputs, TechnicalSignals, authority_score, brand_signals, search_visibility,
    technical_health,
};
use anyhow::{Context, Result};
use futures::future::join_all;
use reqwest::Client;
use url::Url;

/// Competitors audited per comparison; extra URLs are ignored
pub const MAX_COMPETITORS: usize = 3;

/// Provider endpoints and credentials for the audit probes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    pub google_api_key: Option<String>,
    pub serpapi_key: Option<String>,
    pub pagespeed_endpoint: String,
    pub rdap_endpoint: String,
    pub serp_endpoint: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            google_api_key: None,
            serpapi_key: None,
            pagespeed_endpoint: DEFAULT_PAGESPEED_ENDPOINT.to_string(),
            rdap_endpoint: DEFAULT_RDAP_ENDPOINT.to_string(),
            serp_endpoint: DEFAULT_SERP_ENDPOINT.to_string(),
        }
    }
}

/// Runs the single-page authority audit by fanning out to every probe
pub struct Auditor {
    security_client: Client,
    content_client: Client,
    pagespeed: PageSpeedClient,
    rdap: RdapClient,
    technical: TechnicalProbe,
    serp: Option<SerpClient>,
}

impl Auditor {
    pub fn new(config: &AuditConfig) -> Result<Self> {
        let serp = match &config.serpapi_key {
            Some(key) => Some(SerpClient::new(
                build_http_client(15, 5)?,
                config.serp_endpoint.clone(),
                key.clone(),
            )),
            None => None,
        };

        Ok(Self {
            security_client: build_http_client(12, 5)?,
            content_client: build_http_client(15, 5)?,
            pagespeed: PageSpeedClient::new(
                build_http_client(45, 5)?,
                config.pagespeed_endpoint.clone(),
                config.google_api_key.clone(),
            ),
            rdap: RdapClient::new(build_http_client(10, 5)?, config.rdap_endpoint.clone()),
            technical: TechnicalProbe::new()?,
            serp,
        })
    }

    /// The keyword-rank client, when a search API key is configured
    pub fn keywords(&self) -> Option<&SerpClient> {
        self.serp.as_ref()
    }

    /// Audits `url`. Probe failures degrade to default scores; only an
    /// unusable URL is an error.
    pub async fn run_full_audit(&self, url: &str, keywords: &[String]) -> Result<AuditReport> {
        let parsed = Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
        let domain = parsed
            .host_str()
            .with_context(|| format!("URL has no host: {}", url))?
            .to_string();

        let keyword_lookup = async {
            match &self.serp {
                Some(serp) if !keywords.is_empty() => serp.fetch_rankings(&domain, keywords).await,
                _ => Vec::new(),
            }
        };

        let (pagespeed, security, domain_age, content, technical, keywords) = tokio::join!(
            self.pagespeed.fetch(url),
            fetch_security(&self.security_client, url),
            self.rdap.lookup(&domain),
            fetch_content(&self.content_client, url),
            self.technical.run(&parsed),
            keyword_lookup,
        );

        let technical_health = technical_health(TechnicalSignals {
            performance: pagespeed.performance,
            accessibility: pagespeed.accessibility,
            best_practices: pagespeed.best_practices,
            security_score: security.score,
            has_sitemap: technical.sitemap.found,
            has_robots: technical.robots.found,
            ttfb: technical.ttfb,
            redirect_count: technical.redirects.count,
        });
        let search_visibility = search_visibility(pagespeed.seo, average_rank(&keywords));
        let brand_signals = brand_signals(
            domain_age.domain_age_score,
            content.schema_detected,
            content.og_tags_detected,
        );
        // Backlink data needs a paid provider and is always 0
        let backlink_score = 0;

        let authority_score = authority_score(AuthorityInputs {
            technical_health,
            search_visibility,
            content_depth: content.content_score,
            backlink_authority: backlink_score,
            brand_signals,
        });

        tracing::info!(url = %url, authority = authority_score, "Audit complete");

        Ok(AuditReport {
            url: url.to_string(),
            domain,
            pagespeed,
            security,
            domain_age,
            content,
            technical,
            keywords,
            backlink_score,
            technical_health,
            search_visibility,
            brand_signals,
            authority_score,
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Authority summary of a competitor: the audit without technical
    /// checks or keyword ranks
    pub async fn run_competitor_audit(&self, url: &str) -> Result<CompetitorReport> {
        let parsed = Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
        let domain = parsed
            .host_str()
            .with_context(|| format!("URL has no host: {}", url))?
            .to_string();

        let (pagespeed, security, domain_age, content) = tokio::join!(
            self.pagespeed.fetch(url),
            fetch_security(&self.security_client, url),
            self.rdap.lookup(&domain),
            fetch_content(&self.content_client, url),
        );

        let technical_health = technical_health(TechnicalSignals {
            performance: pagespeed.performance,
            accessibility: pagespeed.accessibility,
            best_practices: pagespeed.best_practices,
            security_score: security.score,
            has_sitemap: false,
            has_robots: false,
            ttfb: None,
            redirect_count: 0,
        });
        let search_visibility = search_visibility(pagespeed.seo, None);
        let brand_signals = brand_signals(
            domain_age.domain_age_score,
            content.schema_detected,
            content.og_tags_detected,
        );
        let authority_score = authority_score(AuthorityInputs {
            technical_health,
            search_visibility,
            content_depth: content.content_score,
            backlink_authority: 0,
            brand_signals,
        });

        Ok(CompetitorReport {
            url: url.to_string(),
            domain,
            performance: pagespeed.performance,
            accessibility: pagespeed.accessibility,
            seo: pagespeed.seo,
            best_practices: pagespeed.best_practices,
            security_score: security.score,
            security_grade: security.grade,
            content_score: content.content_score,
            domain_age_score: domain_age.domain_age_score,
            domain_age: domain_age.age_years,
            technical_health,
            search_visibility,
            brand_signals,
            authority_score,
        })
    }

    /// Audits up to [`MAX_COMPETITORS`] sites concurrently. A site that
    /// cannot be audited becomes a failure entry instead of failing the rest.
    pub async fn run_competitor_audits(&self, urls: &[String]) -> Vec<CompetitorResult> {
        let audits = urls
            .iter()
            .take(MAX_COMPETITORS)
            .map(|url| self.run_competitor_audit(url));

        join_all(audits)
            .await
            .into_iter()
            .zip(urls)
            .map(|(result, url)| match result {
                Ok(report) => CompetitorResult::Audited(report),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Competitor audit failed");
                    CompetitorResult::Failed(CompetitorFailure {
                        url: url.clone(),
                        domain: url.clone(),
                        error: e.to_string(),
                        authority_score: 0,
                    })
                }
            })
            .collect()
    }
}
