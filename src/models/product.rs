//! Scraped product data structures.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;

/// Physical dimensions in inches. Any axis may be unknown.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Dimensions {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub depth: Option<f64>,
}

impl Dimensions {
    /// Number of axes with a value.
    pub fn known_axes(&self) -> usize {
        [self.width, self.height, self.depth]
            .iter()
            .filter(|v| v.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.known_axes() == 0
    }

    /// Fill axes missing here from `other`.
    pub fn merge(self, other: Dimensions) -> Self {
        Self {
            width: self.width.or(other.width),
            height: self.height.or(other.height),
            depth: self.depth.or(other.depth),
        }
    }
}

/// A normalized, validated product record returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedProduct {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub dimensions: Option<Dimensions>,
    pub images: Vec<String>,
    pub main_image: Option<String>,
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_options: Option<Vec<String>>,
    pub material: Option<String>,
    pub category: Option<String>,
    pub url: String,
}

impl ScrapedProduct {
    /// True when name, price and images are all missing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.images.is_empty()
    }

    /// Stable identifier derived from the product URL, ignoring query
    /// string, fragment and trailing slash. Scheme and host are
    /// case-insensitive; the path is not.
    pub fn fingerprint(&self) -> String {
        let normalized = match Url::parse(&self.url) {
            Ok(mut url) => {
                url.set_query(None);
                url.set_fragment(None);
                url.to_string()
            }
            Err(_) => self.url.split(['?', '#']).next().unwrap_or_default().to_string(),
        };
        hex::encode(Sha256::digest(normalized.trim_end_matches('/').as_bytes()))
    }
}

/// Where an extracted value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    StructuredData,
    Microdata,
    Selector,
    NameHeuristic,
}

/// Extraction tier that supplied each field of a [`RawProduct`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldSources {
    pub name: Option<FieldSource>,
    pub price: Option<FieldSource>,
    pub images: Option<FieldSource>,
    pub dimensions: Option<FieldSource>,
    pub color: Option<FieldSource>,
    pub material: Option<FieldSource>,
    pub category: Option<FieldSource>,
}

/// Un-normalized scraper output, cleaned into a [`ScrapedProduct`].
#[derive(Debug, Clone, Default)]
pub struct RawProduct {
    pub name: Option<String>,
    pub price: Option<String>,
    pub dimensions: Option<Dimensions>,
    pub images: Vec<String>,
    pub color: Option<String>,
    pub color_options: Vec<String>,
    pub material: Option<String>,
    pub category: Option<String>,
    pub url: String,
    pub sources: FieldSources,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> ScrapedProduct {
        ScrapedProduct {
            name: Some("Oak Dining Table".to_string()),
            price: Some(899.0),
            dimensions: Some(Dimensions {
                width: Some(72.0),
                height: Some(30.0),
                depth: None,
            }),
            images: vec!["https://cdn.example.com/a.jpg".to_string()],
            main_image: Some("https://cdn.example.com/a.jpg".to_string()),
            color: Some("Natural".to_string()),
            color_options: None,
            material: Some("Oak".to_string()),
            category: Some("Dining Tables".to_string()),
            url: "https://shop.example.com/product/oak-table".to_string(),
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(sample_product()).unwrap();
        assert_eq!(json["mainImage"], "https://cdn.example.com/a.jpg");
        assert!(json.get("colorOptions").is_none());
        assert!(json["dimensions"]["depth"].is_null());
    }

    #[test]
    fn test_fingerprint_ignores_query_and_slash() {
        let mut a = sample_product();
        let mut b = sample_product();
        a.url = "https://shop.example.com/product/oak-table/?utm=1".to_string();
        b.url = "https://SHOP.example.com/product/oak-table#reviews".to_string();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_fingerprint_keeps_path_case() {
        let mut a = sample_product();
        let mut b = sample_product();
        a.url = "https://shop.example.com/p/ABC123".to_string();
        b.url = "https://shop.example.com/p/abc123".to_string();
        assert_ne!(a.fingerprint(), b.fingerprint());

        b.url = "HTTPS://Shop.Example.com/p/ABC123/".to_string();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_dimensions_merge() {
        let a = Dimensions {
            width: Some(10.0),
            height: None,
            depth: None,
        };
        let b = Dimensions {
            width: Some(99.0),
            height: Some(20.0),
            depth: None,
        };
        let merged = a.merge(b);
        assert_eq!(merged.width, Some(10.0));
        assert_eq!(merged.height, Some(20.0));
        assert_eq!(merged.known_axes(), 2);
    }
}
