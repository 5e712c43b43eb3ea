pub mod aggregator;
pub mod audit;
pub mod cli;
pub mod config;
pub mod crawler;
pub mod duplicates;
pub mod error;
pub mod html;
pub mod http_client;
pub mod link_extractor;
pub mod models;
pub mod page_analyzer;
pub mod probes;
pub mod rate_limit;
pub mod reporter;
pub mod robots;
pub mod scheduler;
pub mod scoring;
pub mod server;
pub mod store;

pub use crawler::{Crawler, CrawlerConfig, crawl_site};
pub use error::CrawlError;
pub use models::CrawlReport;

use anyhow::Result;
use audit::Auditor;
use cli::{AuditArgs, Cli, Command, CrawlArgs, ServeArgs};
use colored::*;
use config::Config;
use reporter::Reporter;
use server::AppState;
use std::sync::Arc;
use store::{JsonFileStore, ReportStore};

pub async fn run(args: Cli) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let args = config.merge_with_cli(&args);

    match &args.command {
        Command::Crawl(crawl) => run_crawl(&config, crawl, args.verbose).await,
        Command::Audit(audit) => run_audit(&config, audit, args.verbose).await,
        Command::Serve(serve) => run_serve(&config, serve).await,
    }
}

fn print_banner(title: &str) {
    println!("{}", title.bright_cyan().bold());
    println!("{}", "=".repeat(50).bright_blue());
    println!();
}

async fn run_crawl(config: &Config, args: &CrawlArgs, verbose: bool) -> Result<()> {
    let json_output = args.output == "json";
    let crawler_config = config.crawler_config(args.max_pages, args.batch_size);

    let mut crawler = Crawler::new(crawler_config.clone())?;

    if !json_output {
        print_banner("SitePulse - Site Health Crawler");
        println!("{} {}", "Starting crawl:".bright_white().bold(), args.url);
        println!(
            "{} {}",
            "Max pages:".bright_white().bold(),
            crawler_config.max_pages
        );
        println!(
            "{} {}",
            "Batch size:".bright_white().bold(),
            crawler_config.batch_size
        );
        println!();
        if verbose {
            println!("{}", "Analyzing pages...".bright_yellow());
        }
        crawler.enable_progress_bar();
    }

    let report = crawler.crawl_site(&args.url).await?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} {} pages checked, health score {}",
            "Success:".bright_green().bold(),
            report.pages_checked,
            report.overall_health_score
        );
        Reporter::print_crawl_report(&args.url, &report);
    }

    if let Some(filename) = &args.save {
        Reporter::save_json_report(&report, filename)?;
    }

    Ok(())
}

async fn run_audit(config: &Config, args: &AuditArgs, verbose: bool) -> Result<()> {
    let json_output = args.output == "json";
    let audit_config = config.audit_config();

    if !json_output {
        print_banner("SitePulse - Authority Audit");
        println!("{} {}", "Auditing:".bright_white().bold(), args.url);
        if verbose {
            println!(
                "{} {}",
                "PageSpeed key:".bright_white().bold(),
                if audit_config.google_api_key.is_some() {
                    "configured"
                } else {
                    "not set"
                }
            );
        }
        println!();
    }

    if !args.keywords.is_empty() && audit_config.serpapi_key.is_none() {
        tracing::warn!("Keywords given but no search API key is configured; skipping rank lookup");
    }

    let auditor = Auditor::new(&audit_config)?;
    let report = auditor.run_full_audit(&args.url, &args.keywords).await?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        Reporter::print_audit_report(&report);
    }

    if let Some(filename) = &args.save {
        Reporter::save_json_report(&report, filename)?;
    }

    Ok(())
}

async fn run_serve(config: &Config, args: &ServeArgs) -> Result<()> {
    let store = match &args.store_dir {
        Some(dir) => Some(Arc::new(JsonFileStore::new(dir)?) as Arc<dyn ReportStore>),
        None => None,
    };

    let state = AppState::new(
        config.crawler_config(
            config.max_pages.unwrap_or(cli::DEFAULT_MAX_PAGES),
            config.batch_size.unwrap_or(cli::DEFAULT_BATCH_SIZE),
        ),
        &config.audit_config(),
        args.rate_limit,
        store,
    )?;

    server::run_server(&args.bind, state).await
}
