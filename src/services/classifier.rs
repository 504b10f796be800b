//! Product page classification.
//!
//! Detects five weighted indicators on a page and combines them into a
//! confidence score that the page shows a single furniture product.

use crate::error::Result;
use crate::models::{Config, IndicatorWeights, PageIndicators};
use crate::services::page::{Page, element_text};
use crate::services::scraper::Scraper;
use crate::utils::url::is_valid_product_url;

/// Elements that identify an add-to-cart control by attribute alone.
const ADD_TO_CART_SELECTORS: &[&str] = &[
    "#add-to-cart",
    "[data-testid*='add-to-cart']",
    "[data-testid*='addToCart']",
    "[data-test-id*='AddToCart']",
    "button[name='add']",
    "form[action*='/cart'] [type='submit']",
    ".add-to-cart",
    ".add-to-cart-button",
    "[class*='AddToCart']",
    "[class*='add-to-cart']",
];

/// Clickable elements whose label may read like an add-to-cart action.
const BUTTON_LIKE: &str = "button, input[type='submit'], a[role='button']";
const CART_PHRASES: &[&str] = &["add to cart", "add to bag", "add to basket", "buy now"];

/// Result of classifying one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub indicators: PageIndicators,
    pub confidence: f64,
}

impl Classification {
    /// Confidence as a whole percentage, for messages.
    pub fn percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}

/// Service scoring how likely a page is a single product page.
pub struct PageClassifier<'a> {
    config: &'a Config,
}

impl<'a> PageClassifier<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Detect indicators and score them with the configured weights.
    pub fn classify(&self, page: &Page) -> Result<Classification> {
        let indicators = self.detect_indicators(page)?;
        let confidence = calculate_confidence_with(&indicators, &self.config.classifier.weights);
        log::debug!(
            "Classified {}: {:?} -> {:.2}",
            page.url(),
            indicators,
            confidence
        );
        Ok(Classification {
            indicators,
            confidence,
        })
    }

    pub fn detect_indicators(&self, page: &Page) -> Result<PageIndicators> {
        Ok(PageIndicators {
            has_schema_product: page.product_json().is_some() || page.has_microdata_product()?,
            is_single_product: page.count("h1")? == 1,
            has_add_to_cart: has_add_to_cart(page)?,
            has_dimensions: Scraper::generic(self.config)
                .extract_dimensions(page)?
                .is_some(),
            is_product_url: is_valid_product_url(page.url().as_str()),
        })
    }
}

fn has_add_to_cart(page: &Page) -> Result<bool> {
    for selector in ADD_TO_CART_SELECTORS {
        if page.count(selector)? > 0 {
            return Ok(true);
        }
    }

    Ok(page.select(BUTTON_LIKE)?.iter().any(|el| {
        let label = element_text(el)
            .or_else(|| el.value().attr("value").map(str::to_string))
            .unwrap_or_default()
            .to_lowercase();
        CART_PHRASES.iter().any(|phrase| label.contains(phrase))
    }))
}

/// Score indicators with the default weights.
///
/// # Examples
/// ```
/// use furniture_scraper::models::PageIndicators;
/// use furniture_scraper::services::calculate_confidence;
///
/// let indicators = PageIndicators {
///     has_schema_product: true,
///     is_single_product: true,
///     ..Default::default()
/// };
/// assert_eq!(calculate_confidence(&indicators), 0.5);
/// ```
pub fn calculate_confidence(indicators: &PageIndicators) -> f64 {
    calculate_confidence_with(indicators, &IndicatorWeights::default())
}

/// Sum the weights of the indicators present, clamped to `[0, 1]` and
/// rounded to two decimals.
pub fn calculate_confidence_with(indicators: &PageIndicators, weights: &IndicatorWeights) -> f64 {
    let score: f64 = [
        (indicators.has_schema_product, weights.schema_product),
        (indicators.is_single_product, weights.single_product),
        (indicators.has_add_to_cart, weights.add_to_cart),
        (indicators.has_dimensions, weights.dimensions),
        (indicators.is_product_url, weights.product_url),
    ]
    .into_iter()
    .filter(|(present, _)| *present)
    .map(|(_, weight)| weight)
    .sum();

    round2(score.clamp(0.0, 1.0))
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT_PAGE: &str = r#"
        <html><head>
          <script type="application/ld+json">{"@type":"Product","name":"Sven Sofa"}</script>
        </head><body>
          <h1>Sven Sofa</h1>
          <div class="dimensions">88.5" W x 38.5" D x 33" H</div>
          <button class="btn">Add to Cart</button>
        </body></html>
    "#;

    #[test]
    fn test_all_indicators() {
        let config = Config::default();
        let page = Page::parse("https://shop.example.com/products/sven-sofa", PRODUCT_PAGE).unwrap();
        let result = PageClassifier::new(&config).classify(&page).unwrap();

        assert_eq!(
            result.indicators,
            PageIndicators {
                has_schema_product: true,
                is_single_product: true,
                has_add_to_cart: true,
                has_dimensions: true,
                is_product_url: true,
            }
        );
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.percent(), 100);
    }

    #[test]
    fn test_listing_page_scores_low() {
        let html = r#"
            <h1>Sofas</h1><h1>Featured</h1>
            <div class="product-card">Sven Sofa</div>
            <div class="product-card">Kivik Sofa</div>
        "#;
        let config = Config::default();
        let page = Page::parse("https://shop.example.com/category/sofas", html).unwrap();
        let result = PageClassifier::new(&config).classify(&page).unwrap();

        assert_eq!(result.indicators, PageIndicators::default());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_add_to_cart_by_input_value() {
        let html = r#"<form><input type="submit" value="Add to Basket"></form>"#;
        let page = Page::parse("https://shop.example.com/", html).unwrap();
        assert!(has_add_to_cart(&page).unwrap());
    }

    #[test]
    fn test_add_to_cart_by_attribute() {
        let html = r#"<button data-testid="pdp-add-to-cart-button"></button>"#;
        let page = Page::parse("https://shop.example.com/", html).unwrap();
        assert!(has_add_to_cart(&page).unwrap());
    }

    #[test]
    fn test_schema_only() {
        let indicators = PageIndicators {
            has_schema_product: true,
            ..Default::default()
        };
        assert_eq!(calculate_confidence(&indicators), 0.3);
    }

    #[test]
    fn test_confidence_rounded() {
        let indicators = PageIndicators {
            has_dimensions: true,
            is_product_url: true,
            ..Default::default()
        };
        assert_eq!(calculate_confidence(&indicators), 0.3);

        let indicators = PageIndicators {
            has_schema_product: true,
            has_add_to_cart: true,
            has_dimensions: true,
            ..Default::default()
        };
        assert_eq!(calculate_confidence(&indicators), 0.65);
    }

    #[test]
    fn test_confidence_clamped() {
        let weights = IndicatorWeights {
            schema_product: 0.9,
            single_product: 0.9,
            ..Default::default()
        };
        let indicators = PageIndicators {
            has_schema_product: true,
            is_single_product: true,
            ..Default::default()
        };
        assert_eq!(calculate_confidence_with(&indicators, &weights), 1.0);
    }
}
