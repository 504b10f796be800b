//! Furniture Scraper CLI
//!
//! Scrapes furniture product pages fetched over HTTP or read from disk.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use furniture_scraper::{
    error::Result,
    models::Config,
    pipeline::{self, ContentScript},
    services::{Page, PageClassifier},
    storage::LocalStorage,
    utils::http,
};

/// Furniture product page scraper
#[derive(Parser, Debug)]
#[command(
    name = "furniture-scraper",
    version,
    about = "Detects furniture product pages and extracts product data"
)]
struct Cli {
    /// Path to storage directory containing config.toml and products.json
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape one page and print the response JSON
    Scrape {
        /// Page URL
        url: String,

        /// Read the page HTML from a file instead of fetching it
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Print the product page indicators and confidence of a page
    Classify {
        /// Page URL
        url: String,

        /// Read the page HTML from a file instead of fetching it
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Answer JSON messages from stdin, one per line, for a loaded page
    Serve {
        /// Page URL
        url: String,

        /// Read the page HTML from a file instead of fetching it
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Scrape every URL in a file and save products to the catalog
    Batch {
        /// File with one URL per line
        #[arg(long)]
        urls: PathBuf,
    },

    /// Validate configuration files
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Page HTML from `--html` or from the network.
async fn load_html(config: &Config, url: &str, html: Option<&Path>) -> Result<String> {
    match html {
        Some(path) => {
            log::debug!("Reading HTML for {} from {}", url, path.display());
            Ok(std::fs::read_to_string(path)?)
        }
        None => {
            let client = http::create_async_client(&config.crawler)?;
            http::fetch_html(&client, url).await
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");

    let config = Arc::new(Config::load_or_default(&config_path));
    log::debug!("Loaded configuration from {}", cli.storage_dir.display());

    match cli.command {
        Command::Scrape { url, html } => {
            let html = load_html(&config, &url, html.as_deref()).await?;
            let response = pipeline::scrape_html(&url, &html, &config);
            print_json(&response)?;
        }

        Command::Classify { url, html } => {
            let html = load_html(&config, &url, html.as_deref()).await?;
            let page = Page::parse(&url, &html)?;
            let result = PageClassifier::new(&config).classify(&page)?;
            print_json(&serde_json::json!({
                "url": url,
                "indicators": result.indicators,
                "confidence": result.confidence,
            }))?;
        }

        Command::Serve { url, html } => {
            let html = load_html(&config, &url, html.as_deref()).await?;
            let script = ContentScript::load(&url, &html, Arc::clone(&config))?;
            log::info!("Content script loaded for {}", script.page().url());

            let stdout = io::stdout();
            let mut out = stdout.lock();
            for line in io::stdin().lock().lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                writeln!(out, "{}", script.handle_json(&line)?)?;
                out.flush()?;
            }
        }

        Command::Batch { urls } => {
            let client = http::create_async_client(&config.crawler)?;
            let storage = LocalStorage::new(&cli.storage_dir);
            let outcome = pipeline::run_batch(&config, &client, &storage, &urls).await?;

            for failure in &outcome.failures {
                log::info!(
                    "  failed: {} (confidence {:.2}): {}",
                    failure.url,
                    failure.confidence,
                    failure.error
                );
            }
        }

        Command::Validate => {
            // Loaded strictly: a broken config.toml is an error here.
            pipeline::run_validate(&config_path)?;
            log::info!("All validations passed!");
        }
    }

    Ok(())
}
