// src/utils/dimensions.rs

//! Free-text dimension parsing.
//!
//! Product pages describe size in many shapes: `30"W x 20"D x 40"H`,
//! `72 x 35 x 30 in`, `76 cm x 51 cm x 38 cm`, or spread over labelled rows
//! (`Width: 80 cm`). The parser tries each shape from most to least
//! explicit and converts every value to inches.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::models::Dimensions;

const NUM: &str = r"(\d+(?:\.\d+)?)";
const UNIT: &str = r#"(?:(?:millimet(?:er|re)s?|mm|centimet(?:er|re)s?|cm|met(?:er|re)s?|m|inch(?:es)?|in|feet|foot|ft)\b\.?|''|"|”|″|'|′|’)"#;
const LABEL: &str = r"(width|wide|w|depth|deep|d|height|high|tall|h)\b";
const SEP: &str = r"\s*[x×*]\s*";

/// `30"W x 20"D x 40"H`, labels in any order, optional trailing unit.
static LABELLED_TRIPLE: LazyLock<Regex> = LazyLock::new(|| {
    let part = format!(r"{NUM}\s*({UNIT})?\s*{LABEL}");
    Regex::new(&format!(r"(?i){part}{SEP}{part}{SEP}{part}(?:\s*({UNIT}))?"))
        .expect("valid labelled dimension regex")
});

/// `72 x 35 x 30` with an optional trailing unit.
static BARE_TRIPLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i){NUM}{SEP}{NUM}{SEP}{NUM}(?:\s*({UNIT}))?"))
        .expect("valid bare dimension regex")
});

/// `76 cm x 51 cm x 38 cm`.
static UNIT_TRIPLE: LazyLock<Regex> = LazyLock::new(|| {
    let part = format!(r"{NUM}\s*({UNIT})");
    Regex::new(&format!(r"(?i){part}{SEP}{part}{SEP}{part}"))
        .expect("valid unit dimension regex")
});

/// A number directly followed by a metric unit anywhere in the text.
static METRIC_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d\s*(centimet(?:er|re)s?|cm|millimet(?:er|re)s?|mm)\b")
        .expect("valid metric hint regex")
});

/// A single length such as `30 in` or `76cm`.
static LENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i){NUM}\s*({UNIT})?")).expect("valid length regex")
});

static WIDTH: LazyLock<Regex> = LazyLock::new(|| axis_regex("width"));
static HEIGHT: LazyLock<Regex> = LazyLock::new(|| axis_regex("height"));
static DEPTH: LazyLock<Regex> = LazyLock::new(|| axis_regex("depth"));

fn axis_regex(word: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b{word}\s*[:=\-]?\s*{NUM}\s*({UNIT})?"))
        .expect("valid axis dimension regex")
}

/// Length unit recognised in dimension text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Inch,
    Foot,
    Centimeter,
    Millimeter,
    Meter,
}

impl Unit {
    /// Parse a unit token as matched by the dimension regexes.
    pub fn from_token(token: &str) -> Option<Self> {
        let t = token.trim().trim_end_matches('.').to_lowercase();
        match t.as_str() {
            "in" | "inch" | "inches" | "''" | "\"" | "”" | "″" => Some(Self::Inch),
            "ft" | "foot" | "feet" | "'" | "′" | "’" => Some(Self::Foot),
            "cm" => Some(Self::Centimeter),
            "mm" => Some(Self::Millimeter),
            "m" => Some(Self::Meter),
            _ if t.starts_with("centimet") => Some(Self::Centimeter),
            _ if t.starts_with("millimet") => Some(Self::Millimeter),
            _ if t.starts_with("met") => Some(Self::Meter),
            _ => None,
        }
    }

    /// Parse a UN/CEFACT unit code as used by schema.org `QuantitativeValue`.
    pub fn from_unit_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "INH" => Some(Self::Inch),
            "FOT" => Some(Self::Foot),
            "CMT" => Some(Self::Centimeter),
            "MMT" => Some(Self::Millimeter),
            "MTR" => Some(Self::Meter),
            other => Self::from_token(other),
        }
    }

    pub fn to_inches(self, value: f64) -> f64 {
        match self {
            Self::Inch => value,
            Self::Foot => value * 12.0,
            Self::Centimeter => value * 0.393701,
            Self::Millimeter => value * 0.0393701,
            Self::Meter => value * 39.3701,
        }
    }

    /// Guess the unit of unlabelled numbers from the surrounding text.
    /// Defaults to inches.
    pub fn infer(text: &str) -> Self {
        METRIC_HINT
            .captures(text)
            .and_then(|caps| Self::from_token(caps.get(1)?.as_str()))
            .unwrap_or(Self::Inch)
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Width,
    Height,
    Depth,
}

impl Axis {
    fn from_label(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "w" | "width" | "wide" => Some(Self::Width),
            "h" | "height" | "high" | "tall" => Some(Self::Height),
            "d" | "depth" | "deep" => Some(Self::Depth),
            _ => None,
        }
    }
}

/// Parse a dimensions description into inches.
///
/// Returns `None` when no axis could be recovered. Axes that were not
/// found stay `None`.
pub fn parse_dimensions(text: &str) -> Option<Dimensions> {
    let inferred = Unit::infer(text);

    let parsed = parse_labelled(text, inferred)
        .or_else(|| parse_bare(text, inferred))
        .or_else(|| parse_with_units(text))
        .or_else(|| parse_axes(text, inferred));

    if let Some(dims) = &parsed {
        log::debug!("Parsed dimensions {:?} from '{}'", dims, text);
    }
    parsed
}

/// Parse a single length into inches, assuming inches when no unit is
/// given.
pub fn parse_length(text: &str) -> Option<f64> {
    let caps = LENGTH.captures(text)?;
    let unit = unit(&caps, 2).unwrap_or(Unit::Inch);
    Some(unit.to_inches(number(&caps, 1)?))
}

fn number(caps: &Captures, idx: usize) -> Option<f64> {
    caps.get(idx)?.as_str().parse().ok()
}

fn unit(caps: &Captures, idx: usize) -> Option<Unit> {
    caps.get(idx).and_then(|m| Unit::from_token(m.as_str()))
}

fn parse_labelled(text: &str, inferred: Unit) -> Option<Dimensions> {
    let caps = LABELLED_TRIPLE.captures(text)?;
    let trailing = unit(&caps, 10);
    let mut dims = Dimensions::default();

    // Groups per part: number, unit, label.
    for base in [1, 4, 7] {
        let value = number(&caps, base)?;
        let unit = unit(&caps, base + 1).or(trailing).unwrap_or(inferred);
        let axis = Axis::from_label(caps.get(base + 2)?.as_str())?;
        let inches = Some(unit.to_inches(value));
        match axis {
            Axis::Width => dims.width = inches,
            Axis::Height => dims.height = inches,
            Axis::Depth => dims.depth = inches,
        }
    }
    Some(dims)
}

/// Bare triples are read as width x depth x height.
fn parse_bare(text: &str, inferred: Unit) -> Option<Dimensions> {
    let caps = BARE_TRIPLE.captures(text)?;
    let unit = unit(&caps, 4).unwrap_or(inferred);
    Some(Dimensions {
        width: Some(unit.to_inches(number(&caps, 1)?)),
        depth: Some(unit.to_inches(number(&caps, 2)?)),
        height: Some(unit.to_inches(number(&caps, 3)?)),
    })
}

/// Unit-bearing triples are read as width x depth x height.
fn parse_with_units(text: &str) -> Option<Dimensions> {
    let caps = UNIT_TRIPLE.captures(text)?;
    let convert = |n: usize, u: usize| Some(unit(&caps, u)?.to_inches(number(&caps, n)?));
    Some(Dimensions {
        width: convert(1, 2),
        depth: convert(3, 4),
        height: convert(5, 6),
    })
}

fn parse_axes(text: &str, inferred: Unit) -> Option<Dimensions> {
    let axis = |re: &Regex| -> Option<f64> {
        let caps = re.captures(text)?;
        let unit = unit(&caps, 2).unwrap_or(inferred);
        Some(unit.to_inches(number(&caps, 1)?))
    };

    let dims = Dimensions {
        width: axis(&WIDTH),
        height: axis(&HEIGHT),
        depth: axis(&DEPTH),
    };
    (!dims.is_empty()).then_some(dims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("axis should be present");
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_labelled_inches() {
        let dims = parse_dimensions(r#"Overall: 30" H x 72" W x 35" D"#).unwrap();
        approx(dims.width, 72.0);
        approx(dims.height, 30.0);
        approx(dims.depth, 35.0);
    }

    #[test]
    fn test_labelled_trailing_unit() {
        let dims = parse_dimensions("80 W x 55 D x 75 H cm").unwrap();
        approx(dims.width, 80.0 * 0.393701);
        approx(dims.depth, 55.0 * 0.393701);
        approx(dims.height, 75.0 * 0.393701);
    }

    #[test]
    fn test_bare_triple_defaults_to_inches() {
        let dims = parse_dimensions("Size: 72 x 35 x 30").unwrap();
        approx(dims.width, 72.0);
        approx(dims.depth, 35.0);
        approx(dims.height, 30.0);
    }

    #[test]
    fn test_bare_triple_with_trailing_unit() {
        let dims = parse_dimensions("2 x 1 x 0.8 m").unwrap();
        approx(dims.width, 2.0 * 39.3701);
        approx(dims.depth, 1.0 * 39.3701);
        approx(dims.height, 0.8 * 39.3701);
    }

    #[test]
    fn test_unit_triple_centimeters() {
        let dims = parse_dimensions("76 cm x 51 cm x 38 cm").unwrap();
        approx(dims.width, 76.0 * 0.393701);
        approx(dims.depth, 51.0 * 0.393701);
        approx(dims.height, 38.0 * 0.393701);
    }

    #[test]
    fn test_unit_triple_mixed_spelled_out() {
        let dims = parse_dimensions("6 feet x 3 feet x 30 inches").unwrap();
        approx(dims.width, 72.0);
        approx(dims.depth, 36.0);
        approx(dims.height, 30.0);

        let dims = parse_dimensions("1.2 meters x 60 centimeters x 750 millimeters").unwrap();
        approx(dims.width, 1.2 * 39.3701);
        approx(dims.depth, 60.0 * 0.393701);
        approx(dims.height, 750.0 * 0.0393701);
    }

    #[test]
    fn test_unit_triple_quote_marks() {
        let dims = parse_dimensions(r#"30" x 20" x 18""#).unwrap();
        approx(dims.width, 30.0);
        approx(dims.depth, 20.0);
        approx(dims.height, 18.0);
    }

    #[test]
    fn test_per_axis_fallback() {
        let dims = parse_dimensions("Width: 80 cm\nDepth: 55 cm\nHeight: 75 cm").unwrap();
        approx(dims.width, 80.0 * 0.393701);
        approx(dims.depth, 55.0 * 0.393701);
        approx(dims.height, 75.0 * 0.393701);
    }

    #[test]
    fn test_per_axis_partial() {
        let dims = parse_dimensions("Seat height - 18 in").unwrap();
        assert_eq!(dims.width, None);
        approx(dims.height, 18.0);
        assert_eq!(dims.depth, None);
    }

    #[test]
    fn test_no_dimensions() {
        assert_eq!(parse_dimensions("Free shipping on orders over $35"), None);
        assert_eq!(parse_dimensions(""), None);
    }

    #[test]
    fn test_infer_ignores_words_containing_units() {
        assert_eq!(Unit::infer("Recommended for 72 x 35 x 30"), Unit::Inch);
        assert_eq!(Unit::infer("Seat: 45cm high"), Unit::Centimeter);
        assert_eq!(Unit::infer("panel 18 mm thick"), Unit::Millimeter);
    }

    #[test]
    fn test_parse_length() {
        approx(parse_length("30 in"), 30.0);
        approx(parse_length("76cm"), 76.0 * 0.393701);
        approx(parse_length("18"), 18.0);
        assert_eq!(parse_length("n/a"), None);
    }

    #[test]
    fn test_unit_codes() {
        assert_eq!(Unit::from_unit_code("CMT"), Some(Unit::Centimeter));
        assert_eq!(Unit::from_unit_code("inh"), Some(Unit::Inch));
        assert_eq!(Unit::from_unit_code("cm"), Some(Unit::Centimeter));
        assert_eq!(Unit::from_unit_code("parsec"), None);
    }
}
