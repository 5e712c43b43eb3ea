use crate::models::{AuditReport, CrawlReport, Severity};
use crate::scoring::crawl_health_score;
use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::fs::File;
use std::io::Write;

pub struct Reporter;

impl Reporter {
    pub fn print_crawl_report(url: &str, report: &CrawlReport) {
        println!("\n{}", "=".repeat(80).bright_blue());
        println!("{}", "SitePulse - Crawl Report".bright_cyan().bold());
        println!("{}", "=".repeat(80).bright_blue());
        println!();

        println!("{}: {}", "Site".bright_white().bold(), url);
        println!(
            "{}: {}",
            "Overall Health".bright_white().bold(),
            score_colored(report.overall_health_score)
        );
        println!(
            "{}: {}",
            "Issue Health".bright_white().bold(),
            score_colored(crawl_health_score(&report.issues))
        );
        println!(
            "{}: {}",
            "Pages Checked".bright_white().bold(),
            report.pages_checked.to_string().bright_green()
        );
        println!();

        if !report.issues.is_empty() {
            println!("{}", "Issues".bright_yellow().bold().underline());
            for summary in &report.issues {
                println!(
                    "  [{}] {} ({} page{})",
                    severity_label(summary.severity),
                    summary.message,
                    summary.count,
                    if summary.count == 1 { "" } else { "s" }
                );
            }
            println!();
        }

        if !report.duplicate_titles.is_empty() {
            println!("{}", "Duplicate Titles".bright_yellow().bold().underline());
            for group in &report.duplicate_titles {
                println!("  \"{}\"", group.title.bright_white());
                for page in &group.pages {
                    println!("    - {}", page);
                }
            }
            println!();
        }

        println!("{}", "Pages".bright_yellow().bold().underline());
        for page in &report.pages {
            let status = match page.status {
                0 => "ERR".bright_red(),
                code if code < 300 => code.to_string().bright_green(),
                code if code < 400 => code.to_string().yellow(),
                code => code.to_string().bright_red(),
            };
            println!(
                "  {} {} {} {}",
                status,
                score_colored(page.health_score),
                page.url,
                format!("({} ms)", page.load_time).dimmed()
            );
            for issue in &page.issues {
                println!("      [{}] {}", severity_label(issue.severity), issue.message);
            }
        }

        println!();
        println!("{}", "=".repeat(80).bright_blue());
    }

    pub fn print_audit_report(report: &AuditReport) {
        println!("\n{}", "=".repeat(80).bright_blue());
        println!("{}", "SitePulse - Authority Audit".bright_cyan().bold());
        println!("{}", "=".repeat(80).bright_blue());
        println!();

        println!("{}: {}", "URL".bright_white().bold(), report.url);
        println!("{}: {}", "Timestamp".bright_white().bold(), report.timestamp);
        println!(
            "{}: {}",
            "Authority Score".bright_white().bold(),
            score_colored(report.authority_score)
        );
        println!();

        println!("{}", "Scores".bright_yellow().bold().underline());
        println!("  Technical Health:   {}", score_colored(report.technical_health));
        println!("  Search Visibility:  {}", score_colored(report.search_visibility));
        println!("  Content Depth:      {}", score_colored(report.content.content_score));
        println!("  Backlink Authority: {}", score_colored(report.backlink_score));
        println!("  Brand Signals:      {}", score_colored(report.brand_signals));
        println!();

        println!("{}", "PageSpeed (mobile)".bright_yellow().bold().underline());
        println!("  Performance:    {}", score_colored(report.pagespeed.performance));
        println!("  Accessibility:  {}", score_colored(report.pagespeed.accessibility));
        println!("  SEO:            {}", score_colored(report.pagespeed.seo));
        println!("  Best Practices: {}", score_colored(report.pagespeed.best_practices));
        println!();

        println!("{}", "Security Headers".bright_yellow().bold().underline());
        println!(
            "  Grade {} ({}/{} headers present)",
            report.security.grade.to_string().bold(),
            report.security.present_count,
            report.security.total_checks
        );
        println!();

        println!("{}", "Domain".bright_yellow().bold().underline());
        println!("  Domain:     {}", report.domain_age.domain);
        println!(
            "  Registered: {}",
            report
                .domain_age
                .created_date
                .as_deref()
                .unwrap_or("unknown")
        );
        if let Some(age) = report.domain_age.age_years {
            println!("  Age:        {} years", age);
        }
        println!();

        let content = &report.content;
        println!("{}", "Content".bright_yellow().bold().underline());
        println!("  Title:          {}", content.title);
        println!("  Words:          {}", content.word_count);
        println!("  H1 tags:        {}", content.h1_count);
        println!("  Heading depth:  {}", content.heading_depth);
        println!("  Images w/o alt: {}", content.image_without_alt);
        println!(
            "  Schema / OG / Canonical: {} / {} / {}",
            yes_no(content.schema_detected),
            yes_no(content.og_tags_detected),
            yes_no(content.canonical_detected)
        );
        println!();

        let technical = &report.technical;
        println!("{}", "Technical".bright_yellow().bold().underline());
        println!(
            "  Sitemap:   {}",
            technical.sitemap.url.as_deref().unwrap_or("not found")
        );
        println!(
            "  robots.txt: {}{}",
            yes_no(technical.robots.found),
            if technical.robots.disallow_all {
                " (disallows all crawlers)".bright_red().to_string()
            } else {
                String::new()
            }
        );
        match technical.ttfb {
            Some(ttfb) => println!("  TTFB:      {} ms", ttfb),
            None => println!("  TTFB:      {}", "unavailable".dimmed()),
        }
        println!("  Redirects: {}", technical.redirects.count);

        if !report.keywords.is_empty() {
            println!();
            println!("{}", "Keywords".bright_yellow().bold().underline());
            for keyword in &report.keywords {
                match keyword.rank {
                    Some(rank) => println!("  #{:<4} {}", rank, keyword.keyword),
                    None => println!("  {:<5} {}", "-".dimmed(), keyword.keyword),
                }
            }
        }

        println!();
        println!("{}", "=".repeat(80).bright_blue());
    }

    pub fn save_json_report<T: Serialize>(report: &T, filename: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(filename)
            .with_context(|| format!("Failed to create report file: {}", filename))?;
        file.write_all(json.as_bytes())?;
        println!("Report saved to: {}", filename.bright_green());
        Ok(())
    }
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Critical => "CRIT".bright_red(),
        Severity::Warning => "WARN".yellow(),
        Severity::Info => "INFO".bright_cyan(),
    }
}

fn score_colored(score: u32) -> ColoredString {
    let text = format!("{:>3}", score);
    if score >= 80 {
        text.bright_green()
    } else if score >= 50 {
        text.yellow()
    } else {
        text.bright_red()
    }
}

fn yes_no(value: bool) -> ColoredString {
    if value { "yes".green() } else { "no".red() }
}
