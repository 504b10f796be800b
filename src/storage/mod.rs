//! Storage abstractions for scraped product persistence.
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── config.toml           # Scraper configuration
//! └── products.json         # Product catalog, one entry per URL
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::ScrapedProduct;

// Re-export for convenience
pub use local::LocalStorage;

/// Metadata about a storage write operation.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    /// Products in the catalog after the write
    pub count: usize,
    /// Products not seen before
    pub added: usize,
    /// Existing products replaced by a newer scrape
    pub updated: usize,
    /// Timestamp of the write
    pub timestamp: DateTime<Utc>,
}

/// Contents of `products.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// ISO 8601 timestamp of last update
    pub updated_at: DateTime<Utc>,
    /// Total product count
    pub count: usize,
    /// The products, in first-seen order
    pub products: Vec<ScrapedProduct>,
}

impl Catalog {
    pub fn new(products: Vec<ScrapedProduct>) -> Self {
        Self {
            updated_at: Utc::now(),
            count: products.len(),
            products,
        }
    }
}

/// Trait for product storage backends.
#[async_trait]
pub trait ProductStorage: Send + Sync {
    /// Merge products into the catalog. A product whose URL fingerprint is
    /// already stored replaces the stored entry.
    async fn save_products(&self, products: &[ScrapedProduct]) -> Result<WriteMetadata>;

    /// Load every stored product; empty when nothing was saved yet.
    async fn load_products(&self) -> Result<Vec<ScrapedProduct>>;
}
