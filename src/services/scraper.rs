//! Product scrapers.
//!
//! Every field is extracted in tiers: JSON-LD `Product` first, then
//! schema.org microdata, then CSS selectors. A site-specific scraper only
//! differs from the generic one by the selectors it tries before the
//! common lists.

use scraper::ElementRef;
use serde_json::Value;

use crate::error::Result;
use crate::models::{
    Config, Dimensions, FieldSource, RawProduct, ScraperConfig, SelectorField, SiteProfile,
    SiteSelectors,
};
use crate::services::page::{Page, element_text};
use crate::utils::clean_text;
use crate::utils::dimensions::{Unit, parse_dimensions, parse_length};
use crate::utils::text::{color_from_name, material_from_text};

/// Elements scanned for a free-standing dimensions blurb.
const DIMENSION_SCAN: &str = "tr, li, p, dd, td, span, div";
const DIMENSION_LABELS: &[&str] = &["dimension", "overall", "measurements", "product size"];

/// Elements scanned for a "Material: ..." specification row.
const SPEC_ROWS: &str = "tr, li, dd, p";
const MAX_SPEC_ROW: usize = 200;
const COLOR_LABELS: &[&str] = &["colours", "colour", "colors", "color"];
const MATERIAL_LABELS: &[&str] = &["materials", "material"];

const IMAGE_ATTRS: &[&str] = &["data-src", "data-lazy-src", "data-original", "src"];
const SWATCH_ATTRS: &[&str] = &["aria-label", "title", "data-color", "data-value", "alt"];
const SKIPPED_CRUMBS: &[&str] = &["home", "shop", "all", "products"];

/// A scraper bound to one site's selectors (or none, for the generic one).
#[derive(Debug, Clone, Copy)]
pub struct Scraper<'a> {
    name: &'a str,
    site: Option<&'a SiteSelectors>,
    common: &'a SiteSelectors,
    config: &'a ScraperConfig,
}

impl<'a> Scraper<'a> {
    /// Fallback scraper for domains without a dedicated profile.
    pub fn generic(config: &'a Config) -> Self {
        Self {
            name: "generic",
            site: None,
            common: &config.common,
            config: &config.scraper,
        }
    }

    /// Scraper trying the profile's selectors before the common lists.
    pub fn for_site(profile: &'a SiteProfile, config: &'a Config) -> Self {
        Self {
            name: &profile.name,
            site: Some(&profile.selectors),
            common: &config.common,
            config: &config.scraper,
        }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Site selectors first, then the common ones.
    fn selectors(&self, field: SelectorField) -> impl Iterator<Item = &'a str> + use<'a> {
        let common = self.common;
        self.site
            .into_iter()
            .chain(std::iter::once(common))
            .flat_map(move |s| s.field(field).iter().map(String::as_str))
    }

    /// Extract every field from the page.
    pub fn scrape(&self, page: &Page) -> Result<RawProduct> {
        let product = page.product_json();
        let mut raw = RawProduct {
            url: page.url().to_string(),
            ..RawProduct::default()
        };

        if let Some((name, source)) = self.extract_name(page, product)? {
            raw.name = Some(name);
            raw.sources.name = Some(source);
        }
        if let Some((price, source)) = self.extract_price(page, product)? {
            raw.price = Some(price);
            raw.sources.price = Some(source);
        }
        if let Some((images, source)) = self.extract_images(page, product)? {
            raw.images = images;
            raw.sources.images = Some(source);
        }
        if let Some((dims, source)) = self.extract_dimensions(page)? {
            raw.dimensions = Some(dims);
            raw.sources.dimensions = Some(source);
        }

        let (color, options) = self.extract_color(page, product, raw.name.as_deref())?;
        if let Some((color, source)) = color {
            raw.color = Some(color);
            raw.sources.color = Some(source);
        }
        raw.color_options = options;

        if let Some((material, source)) = self.extract_material(page, product, raw.name.as_deref())? {
            raw.material = Some(material);
            raw.sources.material = Some(source);
        }
        if let Some((category, source)) = self.extract_category(page, product, raw.name.as_deref())? {
            raw.category = Some(category);
            raw.sources.category = Some(source);
        }

        log::debug!(
            "Scraper '{}' finished {}: sources {:?}",
            self.name,
            raw.url,
            raw.sources
        );
        Ok(raw)
    }

    fn extract_name(
        &self,
        page: &Page,
        product: Option<&Value>,
    ) -> Result<Option<(String, FieldSource)>> {
        if let Some(name) = product.and_then(|p| p.get("name")).and_then(json_string) {
            return Ok(Some((name, FieldSource::StructuredData)));
        }
        if let Some(name) = page.microdata_value("name")? {
            return Ok(Some((name, FieldSource::Microdata)));
        }
        Ok(page
            .first_text(self.selectors(SelectorField::Name))?
            .map(|name| (name, FieldSource::Selector)))
    }

    fn extract_price(
        &self,
        page: &Page,
        product: Option<&Value>,
    ) -> Result<Option<(String, FieldSource)>> {
        if let Some(price) = product.and_then(structured_price) {
            return Ok(Some((price, FieldSource::StructuredData)));
        }
        if let Some(price) = page.microdata_value("price")? {
            return Ok(Some((price, FieldSource::Microdata)));
        }
        if let Some(price) = page.meta_content("product:price:amount")? {
            return Ok(Some((price, FieldSource::Selector)));
        }

        for selector in self.selectors(SelectorField::Price) {
            for el in page.select(selector)? {
                let text = el
                    .value()
                    .attr("content")
                    .and_then(clean_text)
                    .or_else(|| element_text(&el));
                if let Some(text) = text.filter(|t| t.chars().any(|c| c.is_ascii_digit())) {
                    return Ok(Some((text, FieldSource::Selector)));
                }
            }
        }
        Ok(None)
    }

    fn extract_images(
        &self,
        page: &Page,
        product: Option<&Value>,
    ) -> Result<Option<(Vec<String>, FieldSource)>> {
        if let Some(images) = product
            .and_then(|p| p.get("image"))
            .map(structured_images)
            .filter(|images| !images.is_empty())
        {
            return Ok(Some((images, FieldSource::StructuredData)));
        }

        let microdata = page.microdata_values("image")?;
        if !microdata.is_empty() {
            return Ok(Some((microdata, FieldSource::Microdata)));
        }

        // Gather a few more than needed; the cleaner drops placeholders
        // before capping. Only the first gallery selector with images counts.
        let limit = self.config.max_images * 4;
        let mut images: Vec<String> = page.meta_content("og:image")?.into_iter().collect();
        for selector in self.selectors(SelectorField::Images) {
            let found: Vec<String> = page
                .select(selector)?
                .iter()
                .filter_map(|el| self.image_source(el))
                .collect();
            if found.is_empty() {
                continue;
            }
            for src in found {
                if images.len() >= limit {
                    break;
                }
                if !images.contains(&src) {
                    images.push(src);
                }
            }
            break;
        }

        Ok((!images.is_empty()).then_some((images, FieldSource::Selector)))
    }

    /// The best source attribute of an `<img>` (or of the first image
    /// inside the element), preferring lazy-load attributes over
    /// placeholder `src` values.
    fn image_source(&self, el: &ElementRef<'_>) -> Option<String> {
        let img = el
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().name() == "img")?;
        let value = img.value();

        IMAGE_ATTRS
            .iter()
            .filter_map(|attr| value.attr(attr).and_then(clean_text))
            .find(|src| !self.config.is_placeholder(src))
            .or_else(|| value.attr("srcset").and_then(first_srcset_candidate))
    }

    /// Locate and parse the page's dimensions.
    ///
    /// Structured data with a single axis is completed from the page text.
    pub fn extract_dimensions(&self, page: &Page) -> Result<Option<(Dimensions, FieldSource)>> {
        let structured = page.product_json().and_then(structured_dimensions);
        if let Some(dims) = structured.filter(|d| d.known_axes() >= 2) {
            return Ok(Some((dims, FieldSource::StructuredData)));
        }

        Ok(match (structured, self.dimensions_from_text(page)?) {
            (Some(partial), Some(text)) => Some((partial.merge(text), FieldSource::StructuredData)),
            (Some(partial), None) => Some((partial, FieldSource::StructuredData)),
            (None, text) => text.map(|dims| (dims, FieldSource::Selector)),
        })
    }

    fn dimensions_from_text(&self, page: &Page) -> Result<Option<Dimensions>> {
        for selector in self.selectors(SelectorField::Dimensions) {
            for el in page.select(selector)? {
                if let Some(dims) = element_text(&el).and_then(|t| parse_dimensions(&t)) {
                    return Ok(Some(dims));
                }
            }
        }

        for el in page.select(DIMENSION_SCAN)? {
            let Some(text) = element_text(&el) else {
                continue;
            };
            if text.len() > self.config.max_dimension_text {
                continue;
            }
            let lower = text.to_lowercase();
            if !DIMENSION_LABELS.iter().any(|label| lower.contains(label)) {
                continue;
            }
            if let Some(dims) = parse_dimensions(&text) {
                return Ok(Some(dims));
            }
        }

        Ok(None)
    }

    /// Returns the color and, when the page shows several swatches, every
    /// color option.
    fn extract_color(
        &self,
        page: &Page,
        product: Option<&Value>,
        name: Option<&str>,
    ) -> Result<(Option<(String, FieldSource)>, Vec<String>)> {
        let swatches = self.swatch_labels(page)?;

        let color = if let Some(color) = product.and_then(|p| p.get("color")).and_then(json_string)
        {
            Some((color, FieldSource::StructuredData))
        } else if let Some(color) = page
            .first_text(self.selectors(SelectorField::Color))?
            .and_then(|t| strip_label(&t, COLOR_LABELS))
        {
            Some((color, FieldSource::Selector))
        } else if let Some(first) = swatches.first() {
            Some((first.clone(), FieldSource::Selector))
        } else {
            name.and_then(color_from_name)
                .map(|color| (color, FieldSource::NameHeuristic))
        };

        let options = if swatches.len() >= 2 {
            swatches
        } else {
            Vec::new()
        };
        Ok((color, options))
    }

    /// Labels of the first swatch selector matching anything.
    fn swatch_labels(&self, page: &Page) -> Result<Vec<String>> {
        for selector in self.selectors(SelectorField::Swatches) {
            let labels: Vec<String> = page
                .select(selector)?
                .iter()
                .filter_map(swatch_label)
                .collect();
            if !labels.is_empty() {
                return Ok(labels);
            }
        }
        Ok(Vec::new())
    }

    fn extract_material(
        &self,
        page: &Page,
        product: Option<&Value>,
        name: Option<&str>,
    ) -> Result<Option<(String, FieldSource)>> {
        if let Some(material) = product.and_then(|p| p.get("material")).and_then(json_list) {
            return Ok(Some((material, FieldSource::StructuredData)));
        }
        if let Some(material) = page.microdata_value("material")? {
            return Ok(Some((material, FieldSource::Microdata)));
        }
        if let Some(material) = page
            .first_text(self.selectors(SelectorField::Material))?
            .and_then(|t| strip_label(&t, MATERIAL_LABELS))
        {
            return Ok(Some((material, FieldSource::Selector)));
        }

        for el in page.select(SPEC_ROWS)? {
            let Some(text) = element_text(&el) else {
                continue;
            };
            if text.len() > MAX_SPEC_ROW || !is_labelled(&text, MATERIAL_LABELS) {
                continue;
            }
            if let Some(material) = strip_label(&text, MATERIAL_LABELS) {
                return Ok(Some((material, FieldSource::Selector)));
            }
        }

        Ok(name
            .and_then(material_from_text)
            .map(|material| (material, FieldSource::NameHeuristic)))
    }

    fn extract_category(
        &self,
        page: &Page,
        product: Option<&Value>,
        name: Option<&str>,
    ) -> Result<Option<(String, FieldSource)>> {
        if let Some(category) = product
            .and_then(|p| p.get("category"))
            .and_then(json_string)
            .and_then(|c| last_category_segment(&c))
        {
            return Ok(Some((category, FieldSource::StructuredData)));
        }

        if let Some(category) = page
            .json_ld_of_type("BreadcrumbList")
            .map(breadcrumb_names)
            .and_then(|crumbs| pick_category(crumbs, name))
        {
            return Ok(Some((category, FieldSource::StructuredData)));
        }

        for selector in self.selectors(SelectorField::Breadcrumbs) {
            let crumbs = page
                .select(selector)?
                .iter()
                .filter_map(element_text)
                .collect();
            if let Some(category) = pick_category(crumbs, name) {
                return Ok(Some((category, FieldSource::Selector)));
            }
        }
        Ok(None)
    }
}

/// A JSON string (cleaned) or number as text.
fn json_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => clean_text(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A JSON string, or an array of strings joined with ", ".
fn json_list(value: &Value) -> Option<String> {
    match value {
        Value::Array(values) => {
            let parts: Vec<String> = values.iter().filter_map(json_string).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        other => json_string(other),
    }
}

/// The elements of an array, or the value itself.
fn items(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(values) => values.iter().collect(),
        other => vec![other],
    }
}

fn structured_price(product: &Value) -> Option<String> {
    let offers = product.get("offers")?;
    items(offers).into_iter().find_map(|offer| {
        ["price", "lowPrice"]
            .iter()
            .find_map(|key| offer.get(*key).and_then(json_string))
            .or_else(|| {
                let spec = offer.get("priceSpecification")?;
                items(spec)
                    .into_iter()
                    .find_map(|s| s.get("price").and_then(json_string))
            })
    })
}

fn structured_images(value: &Value) -> Vec<String> {
    items(value)
        .into_iter()
        .filter_map(|image| match image {
            Value::String(s) => clean_text(s),
            Value::Object(_) => image
                .get("url")
                .or_else(|| image.get("contentUrl"))
                .and_then(json_string),
            _ => None,
        })
        .collect()
}

fn structured_dimensions(product: &Value) -> Option<Dimensions> {
    let dims = Dimensions {
        width: product.get("width").and_then(quantity_inches),
        height: product.get("height").and_then(quantity_inches),
        depth: product.get("depth").and_then(quantity_inches),
    };
    if !dims.is_empty() {
        return Some(dims);
    }

    // [{"@type": "PropertyValue", "name": "Overall Dimensions", "value": "..."}]
    let properties = product.get("additionalProperty")?;
    items(properties).into_iter().find_map(|prop| {
        let name = prop.get("name")?.as_str()?.to_lowercase();
        if !name.contains("dimension") {
            return None;
        }
        parse_dimensions(&json_string(prop.get("value")?)?)
    })
}

/// A schema.org length: bare number (inches), text, or `QuantitativeValue`.
fn quantity_inches(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_length(s),
        Value::Object(_) => {
            let amount = match value.get("value")? {
                Value::Number(n) => n.as_f64()?,
                Value::String(s) => s.trim().parse().ok()?,
                _ => return None,
            };
            let unit = value
                .get("unitCode")
                .or_else(|| value.get("unitText"))
                .and_then(Value::as_str)
                .and_then(Unit::from_unit_code)
                .unwrap_or(Unit::Inch);
            Some(unit.to_inches(amount))
        }
        _ => None,
    }
}

fn breadcrumb_names(list: &Value) -> Vec<String> {
    let Some(elements) = list.get("itemListElement") else {
        return Vec::new();
    };

    let mut crumbs: Vec<(f64, String)> = items(elements)
        .into_iter()
        .enumerate()
        .filter_map(|(idx, element)| {
            let name = element
                .get("name")
                .or_else(|| element.get("item")?.get("name"))
                .and_then(json_string)?;
            let position = element
                .get("position")
                .and_then(Value::as_f64)
                .unwrap_or(idx as f64);
            Some((position, name))
        })
        .collect();
    crumbs.sort_by(|a, b| a.0.total_cmp(&b.0));
    crumbs.into_iter().map(|(_, name)| name).collect()
}

/// The deepest breadcrumb that is neither a generic root nor the product
/// itself.
fn pick_category(crumbs: Vec<String>, product_name: Option<&str>) -> Option<String> {
    crumbs
        .into_iter()
        .filter(|crumb| {
            let lower = crumb.to_lowercase();
            !SKIPPED_CRUMBS.contains(&lower.as_str())
                && !product_name.is_some_and(|name| name.eq_ignore_ascii_case(crumb))
        })
        .last()
}

/// "Furniture > Living Room > Sofas" -> "Sofas"
fn last_category_segment(category: &str) -> Option<String> {
    category
        .split(['>', '/', '|'])
        .filter_map(clean_text)
        .last()
}

fn swatch_label(el: &ElementRef<'_>) -> Option<String> {
    let value = el.value();
    SWATCH_ATTRS
        .iter()
        .find_map(|attr| value.attr(attr).and_then(clean_text))
        .or_else(|| element_text(el))
}

fn first_srcset_candidate(srcset: &str) -> Option<String> {
    srcset
        .split(',')
        .next()?
        .split_whitespace()
        .next()
        .and_then(clean_text)
}

/// Text after `label` when `text` opens with it as a whole word.
fn label_rest<'t>(text: &'t str, label: &str) -> Option<&'t str> {
    let head = text.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    let rest = &text[label.len()..];
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c == ':' || c == '-' || c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

fn is_labelled(text: &str, labels: &[&str]) -> bool {
    labels.iter().any(|label| label_rest(text, label).is_some())
}

/// Drop a leading "Label:" from a value; returns the text unchanged when no
/// label is present. A compound label such as "Material Care:" names some
/// other attribute and yields `None`.
fn strip_label(text: &str, labels: &[&str]) -> Option<String> {
    let text = text.trim();
    let Some(rest) = labels.iter().find_map(|label| label_rest(text, label)) else {
        return clean_text(text);
    };
    let value = rest.trim_start_matches(|c: char| c == ':' || c == '-' || c.is_whitespace());
    let separator = &rest[..rest.len() - value.len()];
    let compound = !separator.contains([':', '-'])
        && value
            .split_whitespace()
            .next()
            .is_some_and(|word| word.ends_with(':'));
    if compound {
        return None;
    }
    clean_text(value)
}
