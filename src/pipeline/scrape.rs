// src/pipeline/scrape.rs

//! Single-page scraping pipeline: classify, dispatch, scrape, clean.

use crate::error::Result;
use crate::models::{Config, ScrapeResponse};
use crate::services::{DataCleaner, Page, PageClassifier, round2, select_scraper};

/// Scrape an already parsed page.
///
/// Recoverable failures (low confidence, scraper errors, empty results)
/// come back as a failed [`ScrapeResponse`]. Only errors unrelated to the
/// scraper itself, such as a failing classifier, are returned as `Err`.
pub fn scrape_page(page: &Page, config: &Config) -> Result<ScrapeResponse> {
    let classification = PageClassifier::new(config).classify(page)?;
    let confidence = classification.confidence;

    if confidence < config.classifier.min_confidence {
        log::info!(
            "Skipping {}: confidence {:.2} below {:.2}",
            page.url(),
            confidence,
            config.classifier.min_confidence
        );
        return Ok(ScrapeResponse::failure(
            confidence,
            format!(
                "Page does not appear to be a furniture product page (confidence: {}%)",
                classification.percent()
            ),
        ));
    }

    let hostname = page.hostname();
    let scraper = select_scraper(&hostname, config);
    let raw = match scraper.scrape(page) {
        Ok(raw) => raw,
        Err(e) if e.is_scrape_failure() => {
            log::warn!("Scraper '{}' failed on {}: {}", scraper.name(), page.url(), e);
            return Ok(ScrapeResponse::failure(
                round2(confidence * config.classifier.scrape_error_penalty),
                format!("Error scraping product data: {e}"),
            ));
        }
        Err(e) => return Err(e),
    };

    let product = DataCleaner::new(&config.validation, &config.scraper).clean(raw, page.url());
    if product.is_empty() {
        log::info!("No product data found on {}", page.url());
        return Ok(ScrapeResponse::failure(
            round2(confidence * config.classifier.empty_result_penalty),
            "No product data found on this page",
        ));
    }

    log::info!(
        "Scraped '{}' from {} with '{}' scraper (confidence {:.2})",
        product.name.as_deref().unwrap_or("<unnamed>"),
        page.url(),
        scraper.name(),
        confidence
    );
    Ok(ScrapeResponse::success(confidence, product))
}

/// Parse and scrape a page from its URL and HTML.
///
/// Never fails: any error that escapes [`scrape_page`] becomes a failed
/// response with zero confidence.
pub fn scrape_html(url: &str, html: &str, config: &Config) -> ScrapeResponse {
    match Page::parse(url, html).and_then(|page| scrape_page(&page, config)) {
        Ok(response) => response,
        Err(e) => {
            log::error!("Scrape of {} failed: {}", url, e);
            ScrapeResponse::failure(0.0, e.to_string())
        }
    }
}
