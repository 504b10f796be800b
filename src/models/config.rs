//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{SiteProfile, SiteSelectors};
use crate::utils::parse_selector;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Page classification weights and thresholds
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Plausibility bounds for scraped values
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Extraction settings
    #[serde(default)]
    pub scraper: ScraperConfig,

    /// HTTP and batch behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Selectors shared by every scraper
    #[serde(default = "SiteSelectors::common")]
    pub common: SiteSelectors,

    /// Site-specific scrapers, matched by hostname in order
    #[serde(default = "SiteProfile::defaults")]
    pub sites: Vec<SiteProfile>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.classifier.min_confidence;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AppError::validation(
                "classifier.min_confidence must be within [0, 1]",
            ));
        }
        if self.classifier.weights.total() <= 0.0 {
            return Err(AppError::validation(
                "classifier.weights must sum to a positive value",
            ));
        }
        for (name, penalty) in [
            ("scrape_error_penalty", self.classifier.scrape_error_penalty),
            ("empty_result_penalty", self.classifier.empty_result_penalty),
        ] {
            if !(0.0..=1.0).contains(&penalty) {
                return Err(AppError::validation(format!(
                    "classifier.{name} must be within [0, 1]"
                )));
            }
        }

        let v = &self.validation;
        for (name, range) in [
            ("width", v.width),
            ("height", v.height),
            ("depth", v.depth),
            ("price", v.price),
        ] {
            if range.min >= range.max {
                return Err(AppError::validation(format!(
                    "validation.{name}: min must be below max"
                )));
            }
        }

        if self.scraper.max_images == 0 {
            return Err(AppError::validation("scraper.max_images must be > 0"));
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }

        for site in &self.sites {
            if site.host_contains.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "site '{}' has an empty host_contains",
                    site.name
                )));
            }
        }

        // Every selector must parse, otherwise scraping fails at runtime.
        for selector in self
            .common
            .all()
            .chain(self.sites.iter().flat_map(|s| s.selectors.all()))
        {
            parse_selector(selector)?;
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            validation: ValidationConfig::default(),
            scraper: ScraperConfig::default(),
            crawler: CrawlerConfig::default(),
            common: SiteSelectors::common(),
            sites: SiteProfile::defaults(),
        }
    }
}

/// Weights of the five product-page indicators.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IndicatorWeights {
    #[serde(default = "defaults::weight_schema")]
    pub schema_product: f64,
    #[serde(default = "defaults::weight_single_product")]
    pub single_product: f64,
    #[serde(default = "defaults::weight_add_to_cart")]
    pub add_to_cart: f64,
    #[serde(default = "defaults::weight_dimensions")]
    pub dimensions: f64,
    #[serde(default = "defaults::weight_url")]
    pub product_url: f64,
}

impl IndicatorWeights {
    pub fn total(&self) -> f64 {
        self.schema_product + self.single_product + self.add_to_cart + self.dimensions + self.product_url
    }
}

impl Default for IndicatorWeights {
    fn default() -> Self {
        Self {
            schema_product: defaults::weight_schema(),
            single_product: defaults::weight_single_product(),
            add_to_cart: defaults::weight_add_to_cart(),
            dimensions: defaults::weight_dimensions(),
            product_url: defaults::weight_url(),
        }
    }
}

/// Page classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Indicator weights
    #[serde(default)]
    pub weights: IndicatorWeights,

    /// Pages scoring below this are not scraped
    #[serde(default = "defaults::min_confidence")]
    pub min_confidence: f64,

    /// Confidence multiplier applied when a scraper fails
    #[serde(default = "defaults::scrape_error_penalty")]
    pub scrape_error_penalty: f64,

    /// Confidence multiplier applied when nothing could be extracted
    #[serde(default = "defaults::empty_result_penalty")]
    pub empty_result_penalty: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            weights: IndicatorWeights::default(),
            min_confidence: defaults::min_confidence(),
            scrape_error_penalty: defaults::scrape_error_penalty(),
            empty_result_penalty: defaults::empty_result_penalty(),
        }
    }
}

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

/// Plausibility bounds for furniture. Dimensions are in inches, price in
/// dollars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "defaults::width_bounds")]
    pub width: Bounds,
    #[serde(default = "defaults::height_bounds")]
    pub height: Bounds,
    #[serde(default = "defaults::depth_bounds")]
    pub depth: Bounds,
    #[serde(default = "defaults::price_bounds")]
    pub price: Bounds,

    /// Axes that must fall within bounds for dimensions to be kept
    #[serde(default = "defaults::min_valid_axes")]
    pub min_valid_axes: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            width: defaults::width_bounds(),
            height: defaults::height_bounds(),
            depth: defaults::depth_bounds(),
            price: defaults::price_bounds(),
            min_valid_axes: defaults::min_valid_axes(),
        }
    }
}

/// Extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Maximum number of images kept per product
    #[serde(default = "defaults::max_images")]
    pub max_images: usize,

    /// Image URLs containing any of these substrings are dropped
    #[serde(default = "defaults::placeholder_patterns")]
    pub placeholder_patterns: Vec<String>,

    /// Longest text considered when scanning the page for a dimensions blurb
    #[serde(default = "defaults::max_dimension_text")]
    pub max_dimension_text: usize,
}

impl ScraperConfig {
    /// Whether an image URL matches a placeholder pattern.
    pub fn is_placeholder(&self, src: &str) -> bool {
        let lower = src.to_lowercase();
        self.placeholder_patterns
            .iter()
            .any(|p| lower.contains(&p.to_lowercase()))
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_images: defaults::max_images(),
            placeholder_patterns: defaults::placeholder_patterns(),
            max_dimension_text: defaults::max_dimension_text(),
        }
    }
}

/// HTTP client and batch behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

mod defaults {
    use super::Bounds;

    // Classifier defaults
    pub fn weight_schema() -> f64 {
        0.3
    }
    pub fn weight_single_product() -> f64 {
        0.2
    }
    pub fn weight_add_to_cart() -> f64 {
        0.2
    }
    pub fn weight_dimensions() -> f64 {
        0.15
    }
    pub fn weight_url() -> f64 {
        0.15
    }
    pub fn min_confidence() -> f64 {
        0.3
    }
    pub fn scrape_error_penalty() -> f64 {
        0.8
    }
    pub fn empty_result_penalty() -> f64 {
        0.5
    }

    // Validation defaults
    pub fn width_bounds() -> Bounds {
        Bounds::new(6.0, 144.0)
    }
    pub fn height_bounds() -> Bounds {
        Bounds::new(6.0, 120.0)
    }
    pub fn depth_bounds() -> Bounds {
        Bounds::new(6.0, 72.0)
    }
    pub fn price_bounds() -> Bounds {
        Bounds::new(10.0, 50_000.0)
    }
    pub fn min_valid_axes() -> usize {
        2
    }

    // Scraper defaults
    pub fn max_images() -> usize {
        5
    }
    pub fn placeholder_patterns() -> Vec<String> {
        vec![
            "placeholder".into(),
            "spinner".into(),
            "loading".into(),
            "blank.gif".into(),
            "spacer".into(),
            "pixel.gif".into(),
            "1x1".into(),
            "data:image".into(),
        ]
    }
    pub fn max_dimension_text() -> usize {
        300
    }

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; furniture-scraper/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        250
    }
    pub fn max_concurrent() -> usize {
        4
    }
}
