use sitepulse::aggregator::summarize_issues;
use sitepulse::duplicates::flag_duplicate_titles;
use sitepulse::models::{
    AuditReport, ContentReport, CrawlReport, DomainAge, KeywordRank, PageSpeedScores,
    TechnicalReport,
};
use sitepulse::page_analyzer::PageAnalyzer;
use sitepulse::probes::security::security_report;
use sitepulse::reporter::Reporter;
use sitepulse::scoring::overall_health_score;
use std::fs;
use tempfile::TempDir;

fn sample_crawl_report() -> CrawlReport {
    let mut pages = vec![
        PageAnalyzer::analyze_document(
            "https://example.com/",
            200,
            120,
            "<html><head><title>Home</title></head><body><h1>Home</h1></body></html>",
        ),
        PageAnalyzer::analyze_document(
            "https://example.com/copy",
            200,
            80,
            "<html><head><title>Home</title></head><body></body></html>",
        ),
        PageAnalyzer::broken_page("https://example.com/gone", 410, 15),
        PageAnalyzer::fetch_error("https://example.com/slow", "operation timed out", 12000),
    ];
    let duplicate_titles = flag_duplicate_titles(&mut pages);

    CrawlReport {
        pages_checked: pages.len(),
        issues: summarize_issues(&pages),
        overall_health_score: overall_health_score(&pages),
        duplicate_titles,
        pages,
    }
}

fn sample_audit_report() -> AuditReport {
    AuditReport {
        url: "https://example.com/".to_string(),
        domain: "example.com".to_string(),
        pagespeed: PageSpeedScores {
            performance: 72,
            accessibility: 90,
            seo: 85,
            best_practices: 100,
        },
        security: security_report(&Default::default()),
        domain_age: DomainAge {
            domain: "example.com".to_string(),
            created_date: None,
            age_years: None,
            domain_age_score: 40,
        },
        content: ContentReport::default(),
        technical: TechnicalReport::default(),
        keywords: vec![KeywordRank {
            keyword: "example".to_string(),
            rank: Some(4),
            url: Some("https://example.com/".to_string()),
            checked_at: "2026-01-01T00:00:00+00:00".to_string(),
        }],
        backlink_score: 0,
        technical_health: 66,
        search_visibility: 81,
        brand_signals: 20,
        authority_score: 44,
        timestamp: "2026-01-01T00:00:00+00:00".to_string(),
    }
}

#[test]
fn test_print_reports_do_not_panic() {
    Reporter::print_crawl_report("https://example.com/", &sample_crawl_report());
    Reporter::print_crawl_report(
        "https://example.com/",
        &CrawlReport {
            pages_checked: 0,
            pages: vec![],
            issues: vec![],
            duplicate_titles: vec![],
            overall_health_score: 0,
        },
    );
    Reporter::print_audit_report(&sample_audit_report());
}

#[test]
fn test_save_crawl_report_uses_wire_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("crawl.json");
    let report = sample_crawl_report();

    Reporter::save_json_report(&report, path.to_str().unwrap()).unwrap();

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["pagesChecked"], 4);
    assert_eq!(saved["overallHealthScore"], report.overall_health_score);
    assert_eq!(saved["pages"][0]["loadTime"], 120);
    assert_eq!(saved["pages"][0]["metaDesc"], "");
    assert_eq!(saved["pages"][0]["h1Count"], 1);
    assert_eq!(saved["pages"][3]["status"], 0);
    assert_eq!(saved["pages"][3]["issues"][0]["type"], "fetch_error");
    assert_eq!(saved["pages"][3]["issues"][0]["severity"], "critical");
    assert_eq!(saved["duplicateTitles"][0]["title"], "Home");
    assert_eq!(saved["issues"][0]["type"], "duplicate_title");
}

#[test]
fn test_save_audit_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audit.json");

    Reporter::save_json_report(&sample_audit_report(), path.to_str().unwrap()).unwrap();

    let saved: AuditReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved, sample_audit_report());
}

#[test]
fn test_save_to_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no-such-dir").join("report.json");

    let result = Reporter::save_json_report(&sample_audit_report(), path.to_str().unwrap());
    assert!(result.is_err());
}
