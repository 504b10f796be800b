//! Keyword lookups over product text.

/// Color words recognised in product names, multi-word entries first.
const COLOR_WORDS: &[&str] = &[
    "light gray",
    "light grey",
    "dark gray",
    "dark grey",
    "off-white",
    "off white",
    "navy blue",
    "black",
    "white",
    "gray",
    "grey",
    "charcoal",
    "beige",
    "cream",
    "ivory",
    "brown",
    "espresso",
    "walnut",
    "tan",
    "taupe",
    "natural",
    "blue",
    "navy",
    "green",
    "olive",
    "sage",
    "red",
    "burgundy",
    "pink",
    "blush",
    "orange",
    "rust",
    "yellow",
    "mustard",
    "gold",
    "silver",
    "purple",
    "teal",
];

/// Material words recognised in product names and spec rows.
const MATERIAL_WORDS: &[&str] = &[
    "solid wood",
    "engineered wood",
    "faux leather",
    "leather",
    "velvet",
    "linen",
    "cotton",
    "polyester",
    "boucle",
    "rattan",
    "wicker",
    "oak",
    "walnut",
    "pine",
    "acacia",
    "teak",
    "bamboo",
    "wood",
    "metal",
    "steel",
    "iron",
    "aluminum",
    "glass",
    "marble",
    "plastic",
    "fabric",
];

/// Find the first color word in `text`, title-cased.
///
/// # Examples
/// ```
/// use furniture_scraper::utils::text::color_from_name;
///
/// assert_eq!(
///     color_from_name("Harlow 84\" Sofa in Dark Grey Velvet"),
///     Some("Dark Grey".to_string())
/// );
/// ```
pub fn color_from_name(text: &str) -> Option<String> {
    find_word(text, COLOR_WORDS).map(title_case)
}

/// Find the first material word in `text`, title-cased.
pub fn material_from_text(text: &str) -> Option<String> {
    find_word(text, MATERIAL_WORDS).map(title_case)
}

/// Return the first entry of `words` occurring in `text` as a whole word.
fn find_word<'a>(text: &str, words: &[&'a str]) -> Option<&'a str> {
    let lower = text.to_lowercase();
    words
        .iter()
        .copied()
        .find(|word| contains_word(&lower, word))
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(start, _)| {
        let end = start + word.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn title_case(word: &str) -> String {
    word.split(' ')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
