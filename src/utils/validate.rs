//! Plausibility checks for scraped values.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Dimensions, ValidationConfig};

static PRICE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("valid price regex"));

/// Whether the dimensions are plausible for furniture under the default
/// bounds: at least two axes known, and no known axis out of range.
pub fn validate_dimensions(dims: &Dimensions) -> bool {
    validate_dimensions_with(dims, &ValidationConfig::default())
}

/// Whether enough axes fall within the configured bounds. A known axis
/// outside its bounds rejects the whole set.
pub fn validate_dimensions_with(dims: &Dimensions, config: &ValidationConfig) -> bool {
    let axes = [
        (dims.width, config.width),
        (dims.height, config.height),
        (dims.depth, config.depth),
    ];

    let mut valid = 0;
    for (value, bounds) in axes {
        match value {
            Some(v) if bounds.contains(v) => valid += 1,
            Some(_) => return false,
            None => {}
        }
    }
    valid >= config.min_valid_axes
}

/// Parse a price string and accept it only within the default range.
///
/// # Examples
/// ```
/// use furniture_scraper::utils::validate::validate_price;
///
/// assert_eq!(validate_price("$1,299.99"), Some(1299.99));
/// assert_eq!(validate_price("$5"), None);
/// ```
pub fn validate_price(raw: &str) -> Option<f64> {
    validate_price_with(raw, &ValidationConfig::default())
}

/// Parse a price string and accept it only within the configured range.
pub fn validate_price_with(raw: &str, config: &ValidationConfig) -> Option<f64> {
    let price = parse_price(raw)?;
    if config.price.contains(price) {
        Some(price)
    } else {
        log::debug!("Discarding implausible price {} from '{}'", price, raw);
        None
    }
}

/// Extract the first numeric token of a price string, ignoring currency
/// symbols and thousands separators.
pub fn parse_price(raw: &str) -> Option<f64> {
    let token = PRICE_TOKEN.find(raw)?.as_str();
    let digits: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f64>().ok().filter(|p| p.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: Option<f64>, height: Option<f64>, depth: Option<f64>) -> Dimensions {
        Dimensions {
            width,
            height,
            depth,
        }
    }

    #[test]
    fn test_dimensions_two_of_three() {
        assert!(validate_dimensions(&dims(Some(30.0), Some(20.0), None)));
        assert!(validate_dimensions(&dims(Some(30.0), Some(20.0), Some(18.0))));
    }

    #[test]
    fn test_dimensions_depth_out_of_range() {
        assert!(!validate_dimensions(&dims(Some(30.0), Some(20.0), Some(2.0))));
        assert!(!validate_dimensions(&dims(Some(30.0), Some(2.0), Some(2.0))));
    }

    #[test]
    fn test_dimensions_single_axis() {
        assert!(!validate_dimensions(&dims(Some(30.0), None, None)));
        assert!(!validate_dimensions(&dims(None, None, None)));
    }

    #[test]
    fn test_dimensions_bounds_inclusive() {
        assert!(validate_dimensions(&dims(Some(144.0), Some(6.0), None)));
        assert!(validate_dimensions(&dims(None, Some(120.0), Some(72.0))));
        assert!(!validate_dimensions(&dims(Some(145.0), Some(30.0), Some(20.0))));
    }

    #[test]
    fn test_price_parsing() {
        assert_eq!(validate_price("$1,299.99"), Some(1299.99));
        assert_eq!(validate_price("Now $849.00 Was $1,099.00"), Some(849.0));
        assert_eq!(validate_price("USD 10"), Some(10.0));
    }

    #[test]
    fn test_price_out_of_range() {
        assert_eq!(validate_price("$5"), None);
        assert_eq!(validate_price("$99999"), None);
        assert_eq!(validate_price("Call for price"), None);
    }

    #[test]
    fn test_price_custom_bounds() {
        let mut config = ValidationConfig::default();
        config.price.max = 100_000.0;
        assert_eq!(validate_price_with("$99999", &config), Some(99999.0));
    }
}
