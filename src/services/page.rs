//! A parsed product page: document, URL and embedded structured data.

use scraper::{ElementRef, Html};
use serde_json::Value;
use url::Url;

use crate::error::Result;
use crate::utils::url::hostname;
use crate::utils::{clean_text, parse_selector};

/// An HTML document together with the URL it was loaded from.
pub struct Page {
    url: Url,
    document: Html,
    json_ld: Vec<Value>,
}

impl Page {
    /// Parse `html` as the document found at `url`.
    pub fn parse(url: &str, html: &str) -> Result<Self> {
        let url = Url::parse(url)?;
        let document = Html::parse_document(html);
        let json_ld = extract_json_ld(&document)?;
        log::debug!(
            "Parsed page {} ({} JSON-LD item(s))",
            url,
            json_ld.len()
        );

        Ok(Self {
            url,
            document,
            json_ld,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn hostname(&self) -> String {
        hostname(&self.url)
    }

    /// Every JSON-LD item on the page, with arrays and `@graph` flattened.
    pub fn json_ld(&self) -> &[Value] {
        &self.json_ld
    }

    /// The first JSON-LD item typed `Product`.
    pub fn product_json(&self) -> Option<&Value> {
        self.json_ld_of_type("Product")
    }

    /// The first JSON-LD item with the given `@type`.
    pub fn json_ld_of_type(&self, type_name: &str) -> Option<&Value> {
        self.json_ld.iter().find(|item| has_type(item, type_name))
    }

    /// Elements matching a selector.
    pub fn select(&self, selector: &str) -> Result<Vec<ElementRef<'_>>> {
        let selector = parse_selector(selector)?;
        Ok(self.document.select(&selector).collect())
    }

    /// Number of elements matching a selector.
    pub fn count(&self, selector: &str) -> Result<usize> {
        let selector = parse_selector(selector)?;
        Ok(self.document.select(&selector).count())
    }

    /// Cleaned text of the first element with non-empty text, trying the
    /// selectors in order.
    pub fn first_text<'s>(
        &self,
        selectors: impl IntoIterator<Item = &'s str>,
    ) -> Result<Option<String>> {
        for selector in selectors {
            let selector = parse_selector(selector)?;
            if let Some(text) = self
                .document
                .select(&selector)
                .find_map(|el| element_text(&el))
            {
                return Ok(Some(text));
            }
        }
        Ok(None)
    }

    /// Value of a `<meta property=...>` or `<meta name=...>` tag.
    pub fn meta_content(&self, key: &str) -> Result<Option<String>> {
        let selector = format!("meta[property='{key}'], meta[name='{key}']");
        Ok(self
            .select(&selector)?
            .iter()
            .find_map(|el| el.value().attr("content").and_then(clean_text)))
    }

    /// Whether the page carries schema.org `Product` microdata.
    pub fn has_microdata_product(&self) -> Result<bool> {
        Ok(self.count(MICRODATA_PRODUCT)? > 0)
    }

    /// Values of a microdata property inside a `Product` item scope.
    pub fn microdata_values(&self, prop: &str) -> Result<Vec<String>> {
        let selector = format!("{MICRODATA_PRODUCT} [itemprop='{prop}']");
        Ok(self
            .select(&selector)?
            .iter()
            .filter_map(microdata_value)
            .collect())
    }

    /// First value of a microdata property inside a `Product` item scope.
    pub fn microdata_value(&self, prop: &str) -> Result<Option<String>> {
        Ok(self.microdata_values(prop)?.into_iter().next())
    }
}

const MICRODATA_PRODUCT: &str = "[itemscope][itemtype*='schema.org/Product']";

/// Cleaned text content of an element, `None` when blank. Text nodes are
/// joined with spaces so adjacent cells stay separate words.
pub fn element_text(el: &ElementRef<'_>) -> Option<String> {
    clean_text(&el.text().collect::<Vec<_>>().join(" "))
}

/// Microdata carries values in `content`, `href` or `src` before text.
fn microdata_value(el: &ElementRef<'_>) -> Option<String> {
    let value = el.value();
    value
        .attr("content")
        .or_else(|| value.attr("href"))
        .or_else(|| value.attr("src"))
        .and_then(clean_text)
        .or_else(|| element_text(el))
}

fn extract_json_ld(document: &Html) -> Result<Vec<Value>> {
    let selector = parse_selector("script[type='application/ld+json']")?;
    let mut items = Vec::new();

    for element in document.select(&selector) {
        let text = element.text().collect::<String>();
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => flatten_json_ld(value, &mut items),
            Err(e) => log::debug!("Skipping malformed JSON-LD block: {}", e),
        }
    }

    Ok(items)
}

fn flatten_json_ld(value: Value, items: &mut Vec<Value>) {
    match value {
        Value::Array(values) => {
            for v in values {
                flatten_json_ld(v, items);
            }
        }
        Value::Object(mut map) => {
            if let Some(graph) = map.remove("@graph") {
                flatten_json_ld(graph, items);
            }
            if map.keys().any(|k| k != "@context") {
                items.push(Value::Object(map));
            }
        }
        _ => {}
    }
}

/// Whether a JSON-LD item's `@type` (string or array) names `type_name`.
pub fn has_type(item: &Value, type_name: &str) -> bool {
    let matches = |v: &Value| {
        v.as_str().is_some_and(|t| {
            t.eq_ignore_ascii_case(type_name)
                || t.rsplit('/').next().is_some_and(|t| t.eq_ignore_ascii_case(type_name))
        })
    };

    match item.get("@type") {
        Some(Value::Array(types)) => types.iter().any(matches),
        Some(v) => matches(v),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <html><head>
          <meta property="og:image" content="https://cdn.example.com/og.jpg">
          <script type="application/ld+json">{"@context":"https://schema.org","@graph":[
            {"@type":"WebSite","name":"Shop"},
            {"@type":["Product","Thing"],"name":"Oak Table"}
          ]}</script>
          <script type="application/ld+json">{ not json </script>
        </head><body>
          <div itemscope itemtype="https://schema.org/Product">
            <span itemprop="name">  Oak
              Table </span>
            <meta itemprop="price" content="899.00">
          </div>
          <h1></h1><h1>Second</h1>
        </body></html>
    "#;

    fn page() -> Page {
        Page::parse("https://shop.example.com/product/oak-table", HTML).unwrap()
    }

    #[test]
    fn test_json_ld_graph_flattened() {
        let page = page();
        assert_eq!(page.json_ld().len(), 2);
        assert_eq!(page.product_json().unwrap()["name"], "Oak Table");
        assert!(page.json_ld_of_type("WebSite").is_some());
    }

    #[test]
    fn test_microdata() {
        let page = page();
        assert!(page.has_microdata_product().unwrap());
        assert_eq!(
            page.microdata_value("name").unwrap(),
            Some("Oak Table".to_string())
        );
        assert_eq!(
            page.microdata_value("price").unwrap(),
            Some("899.00".to_string())
        );
    }

    #[test]
    fn test_first_text_skips_empty() {
        let page = page();
        assert_eq!(
            page.first_text(["h2", "h1"]).unwrap(),
            Some("Second".to_string())
        );
    }

    #[test]
    fn test_meta_content() {
        assert_eq!(
            page().meta_content("og:image").unwrap(),
            Some("https://cdn.example.com/og.jpg".to_string())
        );
    }

    #[test]
    fn test_invalid_url_is_error() {
        assert!(Page::parse("not a url", "<html></html>").is_err());
    }

    #[test]
    fn test_has_type_schema_url() {
        let item = serde_json::json!({"@type": "http://schema.org/Product"});
        assert!(has_type(&item, "Product"));
        assert!(!has_type(&item, "Offer"));
    }
}
