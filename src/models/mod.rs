// src/models/mod.rs

//! Domain models for the scraper.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod message;
mod product;
mod selectors;

// Re-export all public types
pub use config::{
    Bounds, ClassifierConfig, Config, CrawlerConfig, IndicatorWeights, ScraperConfig,
    ValidationConfig,
};
pub use message::{PingResponse, Request, Response, ScrapeResponse};
pub use product::{Dimensions, FieldSource, FieldSources, RawProduct, ScrapedProduct};
pub use selectors::{SelectorField, SiteProfile, SiteSelectors};

/// The five signals combined into a product-page confidence score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct PageIndicators {
    pub has_schema_product: bool,
    pub is_single_product: bool,
    pub has_add_to_cart: bool,
    pub has_dimensions: bool,
    pub is_product_url: bool,
}
