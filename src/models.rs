use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Result of analyzing a single crawled page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub url: String,
    /// HTTP status, 0 when the request failed before any response
    pub status: u16,
    pub load_time: u64,
    pub title: String,
    #[serde(rename = "metaDesc")]
    pub meta_description: String,
    pub h1_count: usize,
    pub word_count: usize,
    pub canonical: Option<String>,
    pub health_score: u32,
    pub issues: Vec<Issue>,
}

impl PageResult {
    /// A page that produced no parsed content (fetch error or broken status)
    pub fn failed(url: &str, status: u16, load_time: u64, issue: Issue) -> Self {
        Self {
            url: url.to_string(),
            status,
            load_time,
            title: String::new(),
            meta_description: String::new(),
            h1_count: 0,
            word_count: 0,
            canonical: None,
            health_score: 0,
            issues: vec![issue],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    pub fn new(issue_type: IssueType, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            issue_type,
            severity,
            message: message.into(),
        }
    }
}

/// Issue severity. Variant order doubles as the summary sort rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }

    /// Points subtracted from a page's health score per issue
    pub fn penalty(self) -> u32 {
        match self {
            Severity::Critical => 25,
            Severity::Warning => 10,
            Severity::Info => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    FetchError,
    BrokenPage,
    MissingTitle,
    MissingMeta,
    MissingH1,
    MultipleH1,
    ThinContent,
    MissingCanonical,
    ImgNoAlt,
    ImgFormat,
    ImgNoSize,
    DuplicateTitle,
}

impl IssueType {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueType::FetchError => "fetch_error",
            IssueType::BrokenPage => "broken_page",
            IssueType::MissingTitle => "missing_title",
            IssueType::MissingMeta => "missing_meta",
            IssueType::MissingH1 => "missing_h1",
            IssueType::MultipleH1 => "multiple_h1",
            IssueType::ThinContent => "thin_content",
            IssueType::MissingCanonical => "missing_canonical",
            IssueType::ImgNoAlt => "img_no_alt",
            IssueType::ImgFormat => "img_format",
            IssueType::ImgNoSize => "img_no_size",
            IssueType::DuplicateTitle => "duplicate_title",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry per distinct issue type across a crawl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueSummary {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub message: String,
    pub count: usize,
    pub pages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateTitleGroup {
    pub title: String,
    pub pages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport {
    pub pages_checked: usize,
    pub pages: Vec<PageResult>,
    pub issues: Vec<IssueSummary>,
    pub duplicate_titles: Vec<DuplicateTitleGroup>,
    pub overall_health_score: u32,
}

// Probe results

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpeedScores {
    pub performance: u32,
    pub accessibility: u32,
    pub seo: u32,
    pub best_practices: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityReport {
    pub headers: BTreeMap<String, String>,
    pub present_count: usize,
    pub total_checks: usize,
    pub score: u32,
    pub grade: char,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainAge {
    pub domain: String,
    pub created_date: Option<String>,
    pub age_years: Option<f64>,
    pub domain_age_score: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentReport {
    pub title: String,
    pub meta_description: String,
    pub h1_count: usize,
    pub image_without_alt: usize,
    pub word_count: usize,
    pub heading_depth: usize,
    pub schema_detected: bool,
    pub og_tags_detected: bool,
    pub canonical_detected: bool,
    pub content_score: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapCheck {
    pub found: bool,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotsCheck {
    pub found: bool,
    pub disallow_all: bool,
    pub sitemap_url: Option<String>,
    pub preview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectHop {
    pub url: String,
    pub status: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectChain {
    pub count: usize,
    pub chain: Vec<RedirectHop>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalReport {
    pub sitemap: SitemapCheck,
    pub robots: RobotsCheck,
    /// Time to first byte in milliseconds
    pub ttfb: Option<u64>,
    pub redirects: RedirectChain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRank {
    pub keyword: String,
    pub rank: Option<usize>,
    pub url: Option<String>,
    pub checked_at: String,
}

/// Composite single-page authority audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub url: String,
    pub domain: String,
    pub pagespeed: PageSpeedScores,
    pub security: SecurityReport,
    pub domain_age: DomainAge,
    pub content: ContentReport,
    pub technical: TechnicalReport,
    pub keywords: Vec<KeywordRank>,
    pub backlink_score: u32,
    pub technical_health: u32,
    pub search_visibility: u32,
    pub brand_signals: u32,
    pub authority_score: u32,
    pub timestamp: String,
}

/// Flat authority summary of one competitor site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorReport {
    pub url: String,
    pub domain: String,
    pub performance: u32,
    pub accessibility: u32,
    pub seo: u32,
    pub best_practices: u32,
    pub security_score: u32,
    pub security_grade: char,
    pub content_score: u32,
    pub domain_age_score: u32,
    /// Domain age in years, when the registration date is known
    pub domain_age: Option<f64>,
    pub technical_health: u32,
    pub search_visibility: u32,
    pub brand_signals: u32,
    pub authority_score: u32,
}

/// A competitor that could not be audited at all
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorFailure {
    pub url: String,
    pub domain: String,
    pub error: String,
    pub authority_score: u32,
}

/// One entry of a competitor comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompetitorResult {
    Audited(CompetitorReport),
    Failed(CompetitorFailure),
}

impl CompetitorResult {
    pub fn url(&self) -> &str {
        match self {
            CompetitorResult::Audited(report) => &report.url,
            CompetitorResult::Failed(failure) => &failure.url,
        }
    }

    pub fn authority_score(&self) -> u32 {
        match self {
            CompetitorResult::Audited(report) => report.authority_score,
            CompetitorResult::Failed(failure) => failure.authority_score,
        }
    }
}
