// src/utils/url.rs

//! URL classification and resolution utilities.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Path segments that mark listing pages rather than single products.
/// `search` must be a whole segment so product slugs like `searchlight-lamp`
/// are not caught.
static LISTING_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/(?:category|categories|browse|sb0)/|/search(?:[/?#]|$)")
        .expect("valid listing path regex")
});

static PRODUCT_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/(?:products?|p|dp|pdp|item|itm)/").expect("valid product path regex")
});

/// Whether a URL looks like a single-product page.
///
/// Listing patterns always win over product patterns.
///
/// # Examples
/// ```
/// use furniture_scraper::utils::url::is_valid_product_url;
///
/// assert!(is_valid_product_url("https://www.ikea.com/us/en/p/poaeng-armchair-s09240701/"));
/// assert!(!is_valid_product_url("https://shop.example.com/category/product/sofas"));
/// ```
pub fn is_valid_product_url(url: &str) -> bool {
    if LISTING_PATH.is_match(url) {
        return false;
    }
    PRODUCT_PATH.is_match(url)
}

/// Resolve an image reference found on `page` to an absolute http(s) URL.
///
/// - `//cdn/x.jpg` takes the page protocol
/// - `/x.jpg` takes the page origin
/// - other relative references are joined onto the page URL
///
/// Returns `None` for empty, inline (`data:`) or non-http references.
pub fn resolve_image_url(page: &Url, src: &str) -> Option<String> {
    let src = src.trim();
    if src.is_empty() || src.starts_with("data:") {
        return None;
    }

    let absolute = if src.starts_with("//") {
        format!("{}:{}", page.scheme(), src)
    } else if src.starts_with("http://") || src.starts_with("https://") {
        src.to_string()
    } else if src.starts_with('/') {
        format!("{}{}", page.origin().ascii_serialization(), src)
    } else {
        page.join(src).ok()?.to_string()
    };

    let parsed = Url::parse(&absolute).ok()?;
    matches!(parsed.scheme(), "http" | "https").then(|| parsed.to_string())
}

/// Lowercased hostname of a URL, empty when it has none.
pub fn hostname(url: &Url) -> String {
    url.host_str().unwrap_or_default().to_lowercase()
}
