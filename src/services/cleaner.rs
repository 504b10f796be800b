//! Normalization and plausibility filtering of scraped data.

use url::Url;

use crate::models::{RawProduct, ScrapedProduct, ScraperConfig, ValidationConfig};
use crate::utils::clean_text;
use crate::utils::url::resolve_image_url;
use crate::utils::validate::{validate_dimensions_with, validate_price_with};

/// Turns a [`RawProduct`] into a [`ScrapedProduct`].
///
/// Implausible or unparseable values are dropped to `None`, never reported
/// as errors.
pub struct DataCleaner<'a> {
    validation: &'a ValidationConfig,
    scraper: &'a ScraperConfig,
}

impl<'a> DataCleaner<'a> {
    pub fn new(validation: &'a ValidationConfig, scraper: &'a ScraperConfig) -> Self {
        Self {
            validation,
            scraper,
        }
    }

    pub fn clean(&self, raw: RawProduct, page_url: &Url) -> ScrapedProduct {
        let price = raw
            .price
            .as_deref()
            .and_then(|p| validate_price_with(p, self.validation));

        let dimensions = raw.dimensions.filter(|dims| {
            let valid = validate_dimensions_with(dims, self.validation);
            if !valid {
                log::debug!("Discarding implausible dimensions {:?}", dims);
            }
            valid
        });

        let images = self.clean_images(&raw.images, page_url);
        let color_options = dedupe_case_insensitive(&raw.color_options);

        ScrapedProduct {
            name: raw.name.as_deref().and_then(clean_text),
            price,
            dimensions,
            main_image: images.first().cloned(),
            images,
            color: raw.color.as_deref().and_then(clean_text),
            color_options: (!color_options.is_empty()).then_some(color_options),
            material: raw.material.as_deref().and_then(clean_text),
            category: raw.category.as_deref().and_then(clean_text),
            url: page_url.to_string(),
        }
    }

    /// Resolve, filter placeholders, dedupe and cap.
    fn clean_images(&self, images: &[String], page_url: &Url) -> Vec<String> {
        let mut cleaned: Vec<String> = Vec::new();
        for src in images {
            if self.scraper.is_placeholder(src) {
                continue;
            }
            let Some(resolved) = resolve_image_url(page_url, src) else {
                continue;
            };
            if !cleaned.contains(&resolved) {
                cleaned.push(resolved);
            }
            if cleaned.len() >= self.scraper.max_images {
                break;
            }
        }
        cleaned
    }
}

fn dedupe_case_insensitive(values: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for value in values.iter().filter_map(|v| clean_text(v)) {
        let key = value.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dimensions;

    fn clean(raw: RawProduct) -> ScrapedProduct {
        let validation = ValidationConfig::default();
        let scraper = ScraperConfig::default();
        let url = Url::parse("https://shop.example.com/product/oak-table?ref=home").unwrap();
        DataCleaner::new(&validation, &scraper).clean(raw, &url)
    }

    #[test]
    fn test_text_and_price() {
        let product = clean(RawProduct {
            name: Some("  Oak \n Table ".to_string()),
            price: Some("Now $1,299.99 (was $1,499)".to_string()),
            color: Some("   ".to_string()),
            ..Default::default()
        });
        assert_eq!(product.name.as_deref(), Some("Oak Table"));
        assert_eq!(product.price, Some(1299.99));
        assert_eq!(product.color, None);
        assert_eq!(product.url, "https://shop.example.com/product/oak-table?ref=home");
    }

    #[test]
    fn test_implausible_values_dropped() {
        let product = clean(RawProduct {
            price: Some("$2".to_string()),
            dimensions: Some(Dimensions {
                width: Some(500.0),
                height: Some(30.0),
                depth: Some(20.0),
            }),
            ..Default::default()
        });
        assert_eq!(product.price, None);
        assert_eq!(product.dimensions, None);
    }

    #[test]
    fn test_images() {
        let product = clean(RawProduct {
            images: vec![
                "//cdn.example.com/a.jpg".to_string(),
                "/img/b.jpg".to_string(),
                "c.jpg".to_string(),
                "https://cdn.example.com/a.jpg".to_string(),
                "/img/placeholder.png".to_string(),
                "data:image/gif;base64,R0lGOD".to_string(),
                "https://cdn.example.com/d.jpg".to_string(),
                "https://cdn.example.com/e.jpg".to_string(),
                "https://cdn.example.com/f.jpg".to_string(),
            ],
            ..Default::default()
        });
        assert_eq!(
            product.images,
            vec![
                "https://cdn.example.com/a.jpg",
                "https://shop.example.com/img/b.jpg",
                "https://shop.example.com/product/c.jpg",
                "https://cdn.example.com/d.jpg",
                "https://cdn.example.com/e.jpg",
            ]
        );
        assert_eq!(product.main_image.as_deref(), Some("https://cdn.example.com/a.jpg"));
    }

    #[test]
    fn test_color_options() {
        let product = clean(RawProduct {
            color_options: vec!["Olive".to_string(), "olive ".to_string(), "Rust".to_string()],
            ..Default::default()
        });
        assert_eq!(
            product.color_options,
            Some(vec!["Olive".to_string(), "Rust".to_string()])
        );

        let product = clean(RawProduct::default());
        assert_eq!(product.color_options, None);
        assert!(product.is_empty());
    }
}
