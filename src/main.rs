use anyhow::Result;
use clap::Parser;
use colored::*;
use sitepulse::cli::Cli;
use sitepulse::run;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // RUST_LOG wins over --verbose. Logs go to stderr so JSON on stdout stays clean.
    let default_level = if args.verbose {
        "sitepulse=debug"
    } else {
        "sitepulse=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(args).await {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
