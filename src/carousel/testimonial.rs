//! Testimonial records and feed normalization.
//!
//! The feed is a JSON array of loosely-shaped objects. Entries lacking a
//! name, role or quote are dropped; everything else is trimmed, ratings are
//! clamped to `0..=5` and an excerpt is derived from the quote. Loosely
//! typed fields are coerced rather than rejected: a numeric string is a
//! number, and an id or rating of any other shape falls back to the
//! positional id or the default rating.

use serde::Deserialize;
use serde_json::Value;

use crate::error::MotionError;
use crate::options::CarouselOptions;

/// Highest rating a testimonial can carry.
pub const MAX_RATING: u8 = 5;

/// A normalized testimonial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Testimonial {
    /// Stable identifier (from the feed, or derived from position).
    pub id: String,
    /// Author name.
    pub name: String,
    /// Author role/company.
    pub role: String,
    /// Full quote.
    pub quote: String,
    /// Quote shortened for the card face.
    pub excerpt: String,
    /// Star rating, `0..=5`.
    pub rating: u8,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Author's site.
    pub site_url: Option<String>,
}

/// One entry as it appears in the feed.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTestimonial {
    id: Option<Value>,
    name: Option<Value>,
    role: Option<Value>,
    quote: Option<Value>,
    rating: Option<Value>,
    avatar: Option<Value>,
    site: Option<Value>,
}

/// Trimmed text of a string field; other shapes count as missing.
fn non_empty(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_owned()).filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// Identifier text of a number or non-blank string.
fn raw_id(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Number(n) => Some(n.to_string()),
        other => non_empty(Some(other)),
    }
}

/// Numeric rating from a number or a numeric string.
fn raw_rating(value: Option<Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Clamp a raw rating into `0..=5`. Missing ratings count as full marks.
#[must_use]
pub fn clamp_rating(raw: Option<f64>) -> u8 {
    match raw {
        Some(r) if r.is_finite() => r.round().clamp(0.0, f64::from(MAX_RATING)) as u8,
        Some(_) => 0,
        None => MAX_RATING,
    }
}

/// Shorten `text` to at most `max_chars` characters, cutting at the last
/// whitespace at or before the limit and appending `suffix`. Text within
/// the limit is returned unchanged; text without any whitespace is cut
/// hard at the limit.
#[must_use]
pub fn excerpt(text: &str, max_chars: usize, suffix: &str) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let mut cut = None;
    let mut hard = text.len();
    for (i, (byte, ch)) in text.char_indices().enumerate() {
        if i == max_chars {
            hard = byte;
        }
        if i > max_chars {
            break;
        }
        if ch.is_whitespace() {
            cut = Some(byte);
        }
    }
    let head = text[..cut.unwrap_or(hard)].trim_end();
    format!("{head}{suffix}")
}

impl Testimonial {
    fn from_raw(
        raw: RawTestimonial,
        position: usize,
        options: &CarouselOptions,
    ) -> Option<Self> {
        let name = non_empty(raw.name)?;
        let role = non_empty(raw.role)?;
        let quote = non_empty(raw.quote)?;
        let id = raw_id(raw.id)
            .unwrap_or_else(|| format!("testimonial-{position}"));
        Some(Self {
            id,
            excerpt: excerpt(
                &quote,
                options.excerpt_max_chars,
                &options.excerpt_suffix,
            ),
            name,
            role,
            quote,
            rating: clamp_rating(raw_rating(raw.rating)),
            avatar_url: non_empty(raw.avatar),
            site_url: non_empty(raw.site),
        })
    }
}

/// Parse and normalize a testimonial feed.
///
/// Malformed JSON or a non-array document is an error; individual entries
/// that cannot be used are skipped with a warning.
pub fn parse_feed(
    json: &str,
    options: &CarouselOptions,
) -> Result<Vec<Testimonial>, MotionError> {
    let entries: Vec<Value> = serde_json::from_str(json)
        .map_err(|e| MotionError::DataSource(e.to_string()))?;
    let total = entries.len();
    let items: Vec<Testimonial> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| {
            let raw: RawTestimonial = serde_json::from_value(value)
                .map_err(|e| log::warn!("testimonial {i} unreadable: {e}"))
                .ok()?;
            let item = Testimonial::from_raw(raw, i, options);
            if item.is_none() {
                log::warn!("testimonial {i} missing name, role or quote");
            }
            item
        })
        .collect();
    log::debug!("testimonial feed: {}/{} usable", items.len(), total);
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> CarouselOptions {
        CarouselOptions {
            excerpt_max_chars: 20,
            excerpt_suffix: "...".to_owned(),
            ..CarouselOptions::default()
        }
    }

    #[test]
    fn rating_is_clamped() {
        assert_eq!(clamp_rating(Some(7.0)), 5);
        assert_eq!(clamp_rating(Some(-2.0)), 0);
        assert_eq!(clamp_rating(Some(3.6)), 4);
        assert_eq!(clamp_rating(None), 5);
    }

    #[test]
    fn excerpt_cuts_at_last_whitespace() {
        let quote = "Working with them was a delight from start to finish";
        assert_eq!(excerpt(quote, 20, "..."), "Working with them...");
        // a space sitting exactly on the limit is a valid cut point
        assert_eq!(excerpt(quote, 21, "..."), "Working with them was...");
    }

    #[test]
    fn excerpt_keeps_short_text() {
        assert_eq!(excerpt("Great work", 20, "..."), "Great work");
        assert_eq!(excerpt("exactly-twenty-chars", 20, "..."), "exactly-twenty-chars");
    }

    #[test]
    fn excerpt_without_whitespace_cuts_hard() {
        assert_eq!(excerpt("abcdefghijklmnop", 5, "…"), "abcde…");
    }

    #[test]
    fn excerpt_counts_characters_not_bytes() {
        assert_eq!(excerpt("Zusammenarbeit hat Spaß gemacht", 22, "…"), "Zusammenarbeit hat…");
    }

    #[test]
    fn feed_normalization() {
        let json = r#"[
            {"id": 3, "name": "  Ana ", "role": "Founder", "quote": "Superb.", "rating": 7, "avatar": "/a.png"},
            {"name": "Ben", "role": "CTO", "quote": "  Fast and thoughtful.  ", "site": ""},
            {"name": "No Quote", "role": "Dev"},
            {"name": "", "role": "Dev", "quote": "x"},
            "not an object"
        ]"#;
        let items = parse_feed(json, &opts()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "3");
        assert_eq!(items[0].name, "Ana");
        assert_eq!(items[0].rating, 5);
        assert_eq!(items[0].avatar_url.as_deref(), Some("/a.png"));
        assert_eq!(items[1].id, "testimonial-1");
        assert_eq!(items[1].quote, "Fast and thoughtful.");
        assert_eq!(items[1].site_url, None);
    }

    #[test]
    fn loosely_typed_fields_are_coerced() {
        let json = r#"[
            {"id": 2.5, "name": "Cleo", "role": "PM", "quote": "Calm.", "rating": "4"},
            {"id": true, "name": "Dan", "role": "CEO", "quote": "Sharp.", "rating": "lots"},
            {"id": {"n": 1}, "name": "Eve", "role": "Ops", "quote": "Kind.", "rating": [3], "avatar": 12},
            {"id": "  ", "name": "Fay", "role": "QA", "quote": "Neat.", "rating": " 9 "}
        ]"#;
        let items = parse_feed(json, &opts()).unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].id, "2.5");
        assert_eq!(items[0].rating, 4);
        assert_eq!(items[1].id, "testimonial-1");
        assert_eq!(items[1].rating, MAX_RATING);
        assert_eq!(items[2].id, "testimonial-2");
        assert_eq!(items[2].rating, MAX_RATING);
        assert_eq!(items[2].avatar_url, None);
        assert_eq!(items[3].id, "testimonial-3");
        assert_eq!(items[3].rating, 5);
    }

    #[test]
    fn empty_feed_is_ok() {
        assert!(parse_feed("[]", &opts()).unwrap().is_empty());
    }

    #[test]
    fn malformed_feed_is_an_error() {
        assert!(matches!(
            parse_feed("{\"items\": []}", &opts()),
            Err(MotionError::DataSource(_))
        ));
    }
}
