// src/models/selectors.rs

//! CSS selector lists used by the scrapers.

use serde::{Deserialize, Serialize};

/// Product field a selector list targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorField {
    Name,
    Price,
    Images,
    Dimensions,
    Color,
    Swatches,
    Material,
    Breadcrumbs,
}

/// Prioritized CSS selectors for each product field.
///
/// Every list is tried in order; the first selector producing a usable
/// value wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteSelectors {
    /// Product title elements
    #[serde(default)]
    pub name: Vec<String>,

    /// Price elements (text or `content` attribute)
    #[serde(default)]
    pub price: Vec<String>,

    /// Product gallery images
    #[serde(default)]
    pub images: Vec<String>,

    /// Elements holding a dimensions description
    #[serde(default)]
    pub dimensions: Vec<String>,

    /// The currently selected color
    #[serde(default)]
    pub color: Vec<String>,

    /// Color swatches (one element per option)
    #[serde(default)]
    pub swatches: Vec<String>,

    /// Material description
    #[serde(default)]
    pub material: Vec<String>,

    /// Breadcrumb links, root first
    #[serde(default)]
    pub breadcrumbs: Vec<String>,
}

impl SiteSelectors {
    /// Selector list for one field.
    pub fn field(&self, field: SelectorField) -> &[String] {
        match field {
            SelectorField::Name => &self.name,
            SelectorField::Price => &self.price,
            SelectorField::Images => &self.images,
            SelectorField::Dimensions => &self.dimensions,
            SelectorField::Color => &self.color,
            SelectorField::Swatches => &self.swatches,
            SelectorField::Material => &self.material,
            SelectorField::Breadcrumbs => &self.breadcrumbs,
        }
    }

    /// Iterate over every selector string of every field.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.name
            .iter()
            .chain(&self.price)
            .chain(&self.images)
            .chain(&self.dimensions)
            .chain(&self.color)
            .chain(&self.swatches)
            .chain(&self.material)
            .chain(&self.breadcrumbs)
            .map(String::as_str)
    }

    /// Selectors shared by every scraper, tried after site-specific ones.
    pub fn common() -> Self {
        Self {
            name: strings(&[
                "h1[itemprop='name']",
                "[data-testid='product-title']",
                "h1.product-title",
                "h1.product-name",
                ".product-title h1",
                ".product__title",
                "h1",
            ]),
            price: strings(&[
                "[itemprop='price']",
                "[data-testid='product-price']",
                "[data-testid='price']",
                ".product-price",
                ".price-current",
                ".sale-price",
                ".price",
                "[class*='Price']",
            ]),
            images: strings(&[
                "[data-testid='product-image'] img",
                ".product-gallery img",
                ".product-images img",
                ".product-image img",
                "[class*='gallery'] img",
                "[class*='carousel'] img",
                "main img",
            ]),
            dimensions: strings(&[
                "[data-testid*='dimension']",
                "#dimensions",
                ".product-dimensions",
                ".dimensions",
                "[class*='dimension']",
                "[class*='Dimension']",
            ]),
            color: strings(&[
                "[data-testid='selected-color']",
                ".selected-color",
                ".color-name",
                "[class*='selectedColor']",
            ]),
            swatches: strings(&[
                "[data-testid*='swatch']",
                ".swatch[data-color]",
                ".color-swatch",
                "[class*='swatch'] [aria-label]",
                "[data-color]",
            ]),
            material: strings(&[
                "[data-testid*='material']",
                ".product-material",
                ".material",
                "[class*='material']",
            ]),
            breadcrumbs: strings(&[
                "nav[aria-label*='readcrumb'] a",
                "[itemtype*='BreadcrumbList'] [itemprop='name']",
                ".breadcrumb a",
                ".breadcrumbs a",
                "[class*='breadcrumb'] a",
            ]),
        }
    }

    /// Wayfair-specific selectors.
    pub fn wayfair() -> Self {
        Self {
            name: strings(&["h1[data-hb-id='Heading']", "[data-enzyme-id='ProductTitle']"]),
            price: strings(&[
                "[data-test-id='PriceDisplay']",
                ".SFPrice span",
                "[class*='PriceBlock'] span",
            ]),
            images: strings(&[
                "[data-enzyme-id='FluidImage-wrapper'] img",
                "[data-hb-id='FluidImage'] img",
                ".ProductDetailImageCarousel img",
            ]),
            dimensions: strings(&[
                "[data-enzyme-id='WeightsAndDimensions']",
                "[data-hb-id='Dimensions']",
                ".ProductWeightsDimensions",
            ]),
            color: strings(&["[data-enzyme-id='OptionDetails'] span"]),
            swatches: strings(&[
                "[data-enzyme-id='VisualOptionTile'] [aria-label]",
                "[data-enzyme-id='OptionTile'] [aria-label]",
            ]),
            material: strings(&["[data-enzyme-id='Specifications'] [data-material]"]),
            breadcrumbs: strings(&[
                "[data-enzyme-id='Breadcrumbs'] a",
                "nav[data-hb-id='Breadcrumbs'] a",
            ]),
        }
    }

    /// IKEA-specific selectors.
    pub fn ikea() -> Self {
        Self {
            name: strings(&[
                ".pip-header-section__title--big",
                ".pip-header-section__title",
                ".pip-price-module__name-decorator",
            ]),
            price: strings(&[
                ".pip-temp-price__integer",
                ".pip-price__integer",
                ".pip-price-module__current-price",
            ]),
            images: strings(&[
                ".pip-media-grid__grid img",
                ".pip-product-gallery img",
                ".pip-image",
            ]),
            dimensions: strings(&[
                ".pip-product-dimensions__measurement-wrapper",
                ".pip-product-dimensions",
                "#pip-product-dimensions",
            ]),
            color: strings(&[".pip-header-section__description-text"]),
            swatches: strings(&[".pip-product-styles__items a[aria-label]"]),
            material: strings(&[".pip-product-details__material"]),
            breadcrumbs: strings(&[".bc-breadcrumb__list-item a", ".pip-breadcrumb a"]),
        }
    }
}

/// A named hostname pattern with selectors tried before the common lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteProfile {
    /// Scraper name reported in logs (e.g. "wayfair")
    pub name: String,

    /// Hostname substring selecting this profile
    pub host_contains: String,

    /// Site-specific selectors
    #[serde(default)]
    pub selectors: SiteSelectors,
}

impl SiteProfile {
    /// Whether this profile handles the given hostname.
    pub fn matches(&self, hostname: &str) -> bool {
        hostname
            .to_lowercase()
            .contains(&self.host_contains.to_lowercase())
    }

    /// Profiles shipped by default: Wayfair, then IKEA.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self {
                name: "wayfair".to_string(),
                host_contains: "wayfair".to_string(),
                selectors: SiteSelectors::wayfair(),
            },
            Self {
                name: "ikea".to_string(),
                host_contains: "ikea".to_string(),
                selectors: SiteSelectors::ikea(),
            },
        ]
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
