//! Pipeline entry points for scraper operations.
//!
//! - `scrape_page` / `scrape_html`: classify, dispatch, scrape and clean one page
//! - `ContentScript`: answer `ping` / `scrapeFurniture` messages for a loaded page
//! - `run_batch`: fetch and scrape a list of URLs into the product catalog
//! - `run_validate`: check configuration and selectors

pub mod batch;
pub mod message;
pub mod scrape;
pub mod validate;

pub use batch::{BatchFailure, BatchOutcome, run_batch, scrape_urls};
pub use message::ContentScript;
pub use scrape::{scrape_html, scrape_page};
pub use validate::run_validate;
