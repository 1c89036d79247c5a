//! Locale dictionaries with key-path lookup.
//!
//! Keys are dot-separated paths into a nested JSON object
//! (`"testimonials.empty"`). An unresolved key resolves to itself so a
//! missing translation shows up as its key instead of failing.

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MotionError;

/// Supported page languages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// German.
    De,
}

impl Locale {
    /// BCP 47 language code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
        }
    }

    /// Parse a language code or tag (`"de-AT"` → German). Unknown codes
    /// fall back to English.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        let primary = code.split(['-', '_']).next().unwrap_or_default();
        if primary.eq_ignore_ascii_case("de") {
            Self::De
        } else {
            Self::En
        }
    }
}

/// One language's nested dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    root: Value,
}

impl Dictionary {
    /// Parse a dictionary. The document must be a JSON object.
    pub fn from_json(json: &str) -> Result<Self, MotionError> {
        let root: Value = serde_json::from_str(json)
            .map_err(|e| MotionError::Dictionary(e.to_string()))?;
        if !root.is_object() {
            return Err(MotionError::Dictionary(
                "dictionary root must be an object".to_owned(),
            ));
        }
        Ok(Self { root })
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        key.split('.')
            .try_fold(&self.root, |node, part| match node {
                Value::Object(map) => map.get(part),
                Value::Array(items) => {
                    part.parse::<usize>().ok().and_then(|i| items.get(i))
                }
                _ => None,
            })
    }

    /// Translate `key`. Non-string leaves and misses return the key.
    #[must_use]
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        match self.lookup(key) {
            Some(Value::String(s)) => s.as_str(),
            _ => {
                log::trace!("untranslated key {key}");
                key
            }
        }
    }

    /// Deserialize the value at `key` (lists, nested objects, numbers).
    #[must_use]
    pub fn get_value<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.lookup(key)
            .and_then(|v| T::deserialize(v).ok())
    }
}

/// Dictionaries for every loaded locale.
#[derive(Debug, Clone, Default)]
pub struct Dictionaries {
    by_locale: FxHashMap<Locale, Dictionary>,
}

impl Dictionaries {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a locale's dictionary.
    pub fn insert(&mut self, locale: Locale, dictionary: Dictionary) {
        let _ = self.by_locale.insert(locale, dictionary);
    }

    /// Dictionary for `locale`, falling back to English.
    #[must_use]
    pub fn get(&self, locale: Locale) -> Option<&Dictionary> {
        self.by_locale
            .get(&locale)
            .or_else(|| self.by_locale.get(&Locale::En))
    }

    /// Translate `key` in `locale`; the key itself when unresolved.
    #[must_use]
    pub fn t<'a>(&'a self, locale: Locale, key: &'a str) -> &'a str {
        self.get(locale).map_or(key, |d| d.t(key))
    }
}
