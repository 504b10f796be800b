//! Utility functions and helpers.

pub mod dimensions;
pub mod http;
pub mod text;
pub mod url;
pub mod validate;

use scraper::Selector;

use crate::error::{AppError, Result};

/// Parse a CSS selector, mapping failures into [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Collapse runs of whitespace into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize whitespace and drop empty strings.
pub fn clean_text(s: &str) -> Option<String> {
    let cleaned = normalize_whitespace(s);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selector_valid() {
        assert!(parse_selector("div.class").is_ok());
        assert!(parse_selector("[data-testid*='swatch'] [aria-label]").is_ok());
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(parse_selector("[[invalid").is_err());
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(
            clean_text("  Mid-Century \n  Sofa\t"),
            Some("Mid-Century Sofa".to_string())
        );
        assert_eq!(clean_text(" \n\t "), None);
    }
}
