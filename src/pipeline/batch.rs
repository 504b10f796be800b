// src/pipeline/batch.rs

//! Batch scraping pipeline.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Config, ScrapedProduct};
use crate::pipeline::scrape::scrape_html;
use crate::storage::ProductStorage;
use crate::utils::http::fetch_html;

/// A URL that could not be scraped.
#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub url: String,
    pub confidence: f64,
    pub error: String,
}

/// Summary of a batch run.
#[derive(Debug)]
pub struct BatchOutcome {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub total: usize,
    pub products: Vec<ScrapedProduct>,
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.products.len() as f64 / self.total as f64
    }
}

/// Read a URL list: one URL per line, blank lines and `#` comments skipped.
pub fn read_url_list(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    Ok(parse_url_list(&content))
}

fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Fetch and scrape every URL with bounded concurrency.
///
/// Pages are fetched concurrently; each one is parsed and scraped on the
/// calling task as its body arrives.
pub async fn scrape_urls(config: &Config, client: &Client, urls: Vec<String>) -> BatchOutcome {
    let delay = Duration::from_millis(config.crawler.request_delay_ms);
    let concurrency = config.crawler.max_concurrent.max(1);

    let mut outcome = BatchOutcome {
        started_at: Utc::now(),
        finished_at: Utc::now(),
        total: urls.len(),
        products: Vec::new(),
        failures: Vec::new(),
    };

    let mut pages = stream::iter(urls)
        .map(|url| async move {
            let html = fetch_html(client, &url).await;
            (url, html)
        })
        .buffer_unordered(concurrency);

    while let Some((url, html)) = pages.next().await {
        match html {
            Ok(html) => {
                let response = scrape_html(&url, &html, config);
                match response.data {
                    Some(product) if response.success => outcome.products.push(product),
                    _ => {
                        let error = response.error.unwrap_or_default();
                        log::warn!("Skipped {}: {}", url, error);
                        outcome.failures.push(BatchFailure {
                            url,
                            confidence: response.confidence,
                            error,
                        });
                    }
                }
            }
            Err(error) => {
                log::warn!("Failed to fetch {}: {}", url, error);
                outcome.failures.push(BatchFailure {
                    url,
                    confidence: 0.0,
                    error: error.to_string(),
                });
            }
        }

        if delay.as_millis() > 0 {
            tokio::time::sleep(delay).await;
        }
    }

    outcome.finished_at = Utc::now();
    outcome
}

/// Scrape every URL listed in `urls_path` and save the products.
pub async fn run_batch(
    config: &Config,
    client: &Client,
    storage: &dyn ProductStorage,
    urls_path: &Path,
) -> Result<BatchOutcome> {
    let urls = read_url_list(urls_path)?;
    if urls.is_empty() {
        return Err(AppError::config(format!(
            "No URLs found in {}",
            urls_path.display()
        )));
    }
    log::info!("Scraping {} URLs from {}", urls.len(), urls_path.display());

    let outcome = scrape_urls(config, client, urls).await;
    log::info!(
        "Batch finished in {}s: {} scraped, {} failed ({:.0}% success)",
        (outcome.finished_at - outcome.started_at).num_seconds(),
        outcome.products.len(),
        outcome.failures.len(),
        outcome.success_rate() * 100.0
    );

    if !outcome.products.is_empty() {
        let meta = storage.save_products(&outcome.products).await?;
        log::info!(
            "Saved catalog: {} products ({} new) at {}",
            meta.count,
            meta.added,
            meta.timestamp
        );
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStorage;
    use crate::utils::http::create_async_client;
    use tempfile::TempDir;

    #[test]
    fn test_parse_url_list() {
        let urls = parse_url_list(
            "# sofas\nhttps://a.com/product/1\n\n   https://b.com/p/2  \n#https://c.com/p/3\n",
        );
        assert_eq!(urls, vec!["https://a.com/product/1", "https://b.com/p/2"]);
    }

    #[tokio::test]
    async fn test_unfetchable_urls_are_failures() {
        let mut config = Config::default();
        config.crawler.request_delay_ms = 0;
        let client = create_async_client(&config.crawler).unwrap();

        let outcome = scrape_urls(&config, &client, vec!["not a url".to_string()]).await;
        assert_eq!(outcome.total, 1);
        assert!(outcome.products.is_empty());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].url, "not a url");
        assert_eq!(outcome.success_rate(), 0.0);
    }

    #[tokio::test]
    async fn test_run_batch_empty_list() {
        let tmp = TempDir::new().unwrap();
        let list = tmp.path().join("urls.txt");
        std::fs::write(&list, "# nothing yet\n").unwrap();

        let config = Config::default();
        let client = create_async_client(&config.crawler).unwrap();
        let storage = LocalStorage::new(tmp.path());

        let err = run_batch(&config, &client, &storage, &list).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
