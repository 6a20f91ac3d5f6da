//! Gleaner main entry point
//!
//! This is the command-line interface for the Gleaner text harvester.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use gleaner::analysis::{analyze_file, sentiment_weight};
use gleaner::config::{load_config_with_hash, validate, Config};
use gleaner::crawler::{Crawler, LoggingObserver};
use gleaner::library::{list_saved_files, search_saved_files};
use gleaner::output::print_report;
use gleaner::summarizer::SummarizerClient;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Gleaner: a text harvester for the web
///
/// Gleaner fetches web pages, saves their visible text as plain text files,
/// follows same-site links to a bounded depth, and summarizes saved text
/// with a locally hosted language model server.
#[derive(Parser, Debug)]
#[command(name = "gleaner")]
#[command(version)]
#[command(about = "A text harvester for the web", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site starting from URL and save the text of every page
    Crawl {
        /// Seed URL
        url: String,

        /// Link hops to follow from the seed (overrides crawler.max-depth)
        #[arg(short, long)]
        depth: Option<u32>,

        /// Directory for the text files (overrides output.output-dir)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Validate settings and show what would be crawled without fetching anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Summarize a saved text file
    Summarize {
        file: PathBuf,
    },

    /// Show sentiment, top keywords and a summary for a saved text file
    Analyze {
        file: PathBuf,
    },

    /// List saved text files
    Files,

    /// List saved text files containing KEYWORD (case-insensitive)
    Search {
        keyword: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_settings(cli.config.as_deref())?;

    match cli.command {
        Command::Crawl {
            url,
            depth,
            output_dir,
            dry_run,
        } => {
            if let Some(dir) = output_dir {
                config.output.output_dir = dir;
            }
            if let Some(depth) = depth {
                config.crawler.max_depth = depth;
            }
            validate(&config)?;

            if dry_run {
                handle_dry_run(&config, &url);
                Ok(())
            } else {
                handle_crawl(&config, &url).await
            }
        }
        Command::Summarize { file } => handle_summarize(&config, &file).await,
        Command::Analyze { file } => handle_analyze(&config, &file).await,
        Command::Files => handle_files(&config),
        Command::Search { keyword } => handle_search(&config, &keyword),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gleaner=info,warn"),
            1 => EnvFilter::new("gleaner=debug,info"),
            2 => EnvFilter::new("gleaner=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or the defaults when none is given
fn load_settings(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles `crawl --dry-run`: shows the effective settings
fn handle_dry_run(config: &Config, url: &str) {
    println!("=== Gleaner Dry Run ===\n");

    println!("Seed: {}", url);

    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Fetch delay: {}s", config.crawler.fetch_delay_seconds);
    match config.crawler.page_limit() {
        Some(limit) => println!("  Max pages: {}", limit),
        None => println!("  Max pages: unlimited"),
    }
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_seconds
    );

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Directory: {}", config.output.output_dir.display());

    println!("\nSummarizer:");
    println!("  Endpoint: {}", config.summarizer.endpoint_url());
    println!("  Model: {}", config.summarizer.model);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, url: &str) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let crawler = Crawler::from_config(config)?.with_cancellation(cancel.clone());

    // Ctrl-C stops the crawl after the current page
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current page");
            cancel.cancel();
        }
    });

    let report = match crawler
        .run(url, config.crawler.max_depth, &LoggingObserver)
        .await
    {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    println!();
    print_report(&report);
    println!(
        "\nText files written to: {}",
        config.output.output_dir.display()
    );
    Ok(())
}

async fn handle_summarize(config: &Config, file: &Path) -> anyhow::Result<()> {
    let client = SummarizerClient::new(&config.summarizer)?;
    let response = client
        .summarize_file(file, &config.summarizer.default_options())
        .await;

    if response.is_success() {
        println!("{}", response.summary);
        Ok(())
    } else {
        bail!(
            "Summary failed: {}",
            response.error.unwrap_or_else(|| "unknown error".to_string())
        )
    }
}

async fn handle_analyze(config: &Config, file: &Path) -> anyhow::Result<()> {
    let client = SummarizerClient::new(&config.summarizer)?;
    let analysis = analyze_file(&client, file, &config.summarizer.default_options()).await?;

    println!("File: {}", analysis.file_name);
    println!("Sentiment: {}", analysis.sentiment);
    if analysis.keywords.is_empty() {
        println!("Top Keywords: None");
    } else {
        println!("Top Keywords: {}", analysis.keywords.join(", "));
    }

    match (&analysis.summary.error, analysis.summary.is_success()) {
        (_, true) => println!("\nSummary:\n{}", analysis.summary.summary),
        (Some(reason), false) => println!("\nSummary unavailable: {}", reason),
        (None, false) => println!("\nSummary unavailable"),
    }
    Ok(())
}

fn handle_files(config: &Config) -> anyhow::Result<()> {
    let dir = &config.output.output_dir;
    let files = list_saved_files(dir)?;

    if files.is_empty() {
        println!("No saved files in {}", dir.display());
        return Ok(());
    }

    println!("{:<60} {:>10} {:>10}", "File Name", "Bytes", "Sentiment");
    for file in &files {
        let sentiment = std::fs::read_to_string(&file.path)
            .map(|text| sentiment_weight(&text).to_string())
            .unwrap_or_else(|_| "N/A".to_string());
        println!("{:<60} {:>10} {:>10}", file.name, file.size_bytes, sentiment);
    }
    println!("\n{} files in {}", files.len(), dir.display());
    Ok(())
}

fn handle_search(config: &Config, keyword: &str) -> anyhow::Result<()> {
    let matches = search_saved_files(&config.output.output_dir, keyword)?;

    if matches.is_empty() {
        println!("No matches found.");
    } else {
        for name in matches {
            println!("{}: FOUND", name);
        }
    }
    Ok(())
}
