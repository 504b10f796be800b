//! Service layer for the scraper.
//!
//! This module contains the per-page logic for:
//! - Page parsing and structured data lookup (`Page`)
//! - Product page classification (`PageClassifier`)
//! - Hostname-based scraper selection (`select_scraper`)
//! - Field extraction (`Scraper`)
//! - Normalization and validation (`DataCleaner`)

mod classifier;
mod cleaner;
mod dispatch;
pub mod page;
mod scraper;

pub use classifier::{Classification, PageClassifier, calculate_confidence, calculate_confidence_with};
pub(crate) use classifier::round2;
pub use cleaner::DataCleaner;
pub use dispatch::select_scraper;
pub use page::Page;
pub use self::scraper::Scraper;
