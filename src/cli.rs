use clap::{Args, Parser, Subcommand};

pub const DEFAULT_MAX_PAGES: usize = 25;
pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_OUTPUT: &str = "text";
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_RATE_LIMIT: u32 = 5;

#[derive(Parser, Debug, Clone)]
#[command(name = "sitepulse")]
#[command(about = "Website health crawler and authority auditor", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (JSON, TOML, or YAML)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Crawl a site and report page health issues
    Crawl(CrawlArgs),
    /// Run the authority audit for a single URL
    Audit(AuditArgs),
    /// Serve the JSON HTTP API
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CrawlArgs {
    /// The homepage URL to start crawling from
    #[arg(value_name = "URL")]
    pub url: String,

    /// Maximum number of pages to analyze (default: 25)
    #[arg(short, long, default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: usize,

    /// Pages analyzed concurrently per batch (default: 5)
    #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Output format: text or json
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Save report to file
    #[arg(short, long)]
    pub save: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct AuditArgs {
    /// The URL to audit
    #[arg(value_name = "URL")]
    pub url: String,

    /// Keyword to check the domain's search rank for (repeatable)
    #[arg(short, long = "keyword", value_name = "KEYWORD")]
    pub keywords: Vec<String>,

    /// Output format: text or json
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Save report to file
    #[arg(short, long)]
    pub save: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Requests allowed per client per minute (default: 5)
    #[arg(short, long, default_value_t = DEFAULT_RATE_LIMIT)]
    pub rate_limit: u32,

    /// Directory where finished reports are stored as JSON files
    #[arg(long)]
    pub store_dir: Option<String>,
}
